//! Donor pages: list, detail and the create/update/delete forms.

use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::models::{DonorDetail, DonorForm, Permission};
use crate::response::{success_created, success_one_ok, success_page};
use crate::service::{DonorService, ListParams};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
    Json,
};

/// Redirect target after a donor is deleted.
pub const DONORS_PAGE: &str = "/donors/";

pub async fn list_donors(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let (limit, offset) = params.resolve(state.config.page_limit);
    let donors = DonorService::list(&state.pool, limit, offset).await?;
    Ok(success_page(donors, limit, offset))
}

pub async fn donor_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let donor = DonorService::get(&state.pool, id).await?;
    let scholarships = DonorService::scholarships(&state.pool, id).await?;
    Ok(success_one_ok(DonorDetail {
        display: donor.to_string(),
        donor,
        scholarships,
    }))
}

pub async fn create_donor(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<DonorForm>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Permission::AddDonor)?;
    let donor = DonorService::create(&state.pool, &form).await?;
    Ok(success_created(&donor.absolute_url(), donor))
}

/// GET on the update form: the current values.
pub async fn edit_donor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    user.require(Permission::ChangeDonor)?;
    let donor = DonorService::get(&state.pool, id).await?;
    Ok(success_one_ok(donor))
}

pub async fn update_donor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: CurrentUser,
    Json(form): Json<DonorForm>,
) -> Result<impl IntoResponse, AppError> {
    user.require(Permission::ChangeDonor)?;
    let donor = DonorService::update(&state.pool, id, &form).await?;
    Ok(success_one_ok(donor))
}

/// GET on the delete form: the record about to be removed.
pub async fn confirm_delete_donor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    user.require(Permission::DeleteDonor)?;
    let donor = DonorService::get(&state.pool, id).await?;
    Ok(success_one_ok(donor))
}

pub async fn delete_donor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    user: CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    user.require(Permission::DeleteDonor)?;
    DonorService::delete(&state.pool, id).await?;
    Ok(Redirect::to(DONORS_PAGE))
}
