//! Applications: applicants list, applied-instance views, the apply form and status marking.

use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::models::{today, ApplyForm, InstanceView, Permission, StatusForm, Student};
use crate::response::{success_one_ok, success_page};
use crate::service::{InstanceService, ListParams, StudentService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

/// Redirect target after a successful application.
pub const SUCCESS_PAGE: &str = "/success";

/// Students with at least one application.
pub async fn list_applicants(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = params.resolve(state.config.page_limit);
    let applicants = StudentService::list_applicants(&state.pool, limit, offset).await?;
    Ok(success_page(applicants, limit, offset))
}

/// Instances the current user applied for.
pub async fn my_applied(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = params.resolve(state.config.page_limit);
    let rows = InstanceService::applied_by(&state.pool, user.user.id, limit, offset).await?;
    let views: Vec<InstanceView> = rows.into_iter().map(InstanceView::from).collect();
    Ok(success_page(views, limit, offset))
}

/// Every applied instance across users. Requires `can_mark_awarded`.
pub async fn all_applied(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Permission::CanMarkAwarded)?;
    let (limit, offset) = params.resolve(state.config.page_limit);
    let rows = InstanceService::all_applied(&state.pool, limit, offset).await?;
    let views: Vec<InstanceView> = rows.into_iter().map(InstanceView::from).collect();
    Ok(success_page(views, limit, offset))
}

#[derive(Serialize)]
pub struct ApplyPage {
    #[serde(flatten)]
    pub instance: InstanceView,
    pub applicants: Vec<Student>,
}

/// GET on the apply form: the instance and who already applied.
pub async fn apply_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    _user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let instance = InstanceService::get(&state.pool, id).await?;
    let applicants = InstanceService::applicants(&state.pool, id).await?;
    Ok(success_one_ok(ApplyPage {
        instance: InstanceView::from(instance),
        applicants,
    }))
}

pub async fn apply(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: CurrentUser,
    Json(form): Json<ApplyForm>,
) -> Result<impl IntoResponse, AppError> {
    InstanceService::apply(&state.pool, id, form.student_id, user.user.id, today()).await?;
    Ok(Redirect::to(SUCCESS_PAGE))
}

/// Set an instance's status. Requires `can_mark_awarded`.
pub async fn mark_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: CurrentUser,
    Json(form): Json<StatusForm>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Permission::CanMarkAwarded)?;
    let instance = InstanceService::set_status(&state.pool, id, form.status).await?;
    Ok(success_one_ok(InstanceView::from(instance)))
}
