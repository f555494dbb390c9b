//! Home page and the apply confirmation page.

use crate::error::AppError;
use crate::response::success_one_ok;
use crate::service::CatalogService;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};
use serde::Serialize;

pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let counts = CatalogService::counts(&state.pool).await?;
    Ok(success_one_ok(counts))
}

#[derive(Serialize)]
struct SuccessBody {
    message: &'static str,
}

pub async fn success() -> impl IntoResponse {
    success_one_ok(SuccessBody {
        message: "Your application was received.",
    })
}
