//! Routers: common (health/version) and archive pages, assembled by [`app`].

mod archive;
mod common;

pub use archive::archive_routes;
pub use common::common_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application: archive pages, health routes, body limit and request tracing.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(archive_routes(state))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}
