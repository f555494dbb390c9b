//! Scholarship pages: list, detail and the create/update/delete forms.

use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::models::{Permission, ScholarshipForm};
use crate::response::{success_created, success_one_ok, success_page};
use crate::service::{ListParams, ScholarshipService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    Json,
};

/// Redirect target after a scholarship is deleted.
pub const SCHOLARSHIPS_PAGE: &str = "/scholarships/";

pub async fn list_scholarships(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = params.resolve(state.config.page_limit);
    let scholarships = ScholarshipService::list(&state.pool, limit, offset).await?;
    Ok(success_page(scholarships, limit, offset))
}

pub async fn scholarship_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let detail = ScholarshipService::detail(&state.pool, id).await?;
    Ok(success_one_ok(detail))
}

pub async fn create_scholarship(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<ScholarshipForm>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Permission::AddScholarship)?;
    let scholarship = ScholarshipService::create(&state.pool, &form).await?;
    let detail = ScholarshipService::detail(&state.pool, scholarship.id).await?;
    Ok(success_created(&scholarship.absolute_url(), detail))
}

/// GET on the update form: the current values, including the type set.
pub async fn edit_scholarship(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    user.require(Permission::ChangeScholarship)?;
    let detail = ScholarshipService::detail(&state.pool, id).await?;
    Ok(success_one_ok(detail))
}

pub async fn update_scholarship(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: CurrentUser,
    Json(form): Json<ScholarshipForm>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Permission::ChangeScholarship)?;
    ScholarshipService::update(&state.pool, id, &form).await?;
    let detail = ScholarshipService::detail(&state.pool, id).await?;
    Ok(success_one_ok(detail))
}

/// GET on the delete form: the record about to be removed.
pub async fn confirm_delete_scholarship(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    user.require(Permission::DeleteScholarship)?;
    let scholarship = ScholarshipService::get(&state.pool, id).await?;
    Ok(success_one_ok(scholarship))
}

pub async fn delete_scholarship(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    user.require(Permission::DeleteScholarship)?;
    ScholarshipService::delete(&state.pool, id).await?;
    Ok(Redirect::to(SCHOLARSHIPS_PAGE))
}
