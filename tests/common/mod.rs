//! Shared helpers for HTTP-level tests: build the router on a fresh test database and
//! drive it with `tower::ServiceExt::oneshot`, without a TCP listener.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use scholarship_archive::extractors::USER_ID_HEADER;
use scholarship_archive::models::{CreateUser, Permission};
use scholarship_archive::service::UserService;
use scholarship_archive::{app, apply_migrations, AppState, ServerConfig};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// Apply the schema and build the full application router.
pub async fn build_test_app(pool: PgPool) -> Router {
    apply_migrations(&pool).await.expect("migrations apply");
    app(AppState::new(pool, ServerConfig::default()))
}

/// Create a user holding `permissions`; returns its id for the `X-User-Id` header.
pub async fn user_with(pool: &PgPool, username: &str, permissions: &[Permission]) -> i64 {
    UserService::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            permissions: permissions.to_vec(),
        },
    )
    .await
    .expect("user created")
    .id
}

pub async fn send(app: &Router, method: Method, uri: &str, user: Option<i64>, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user {
        builder = builder.header(USER_ID_HEADER, id.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: &Router, uri: &str, user: i64) -> Response<Body> {
    send(app, Method::GET, uri, Some(user), None).await
}

pub async fn post_as(app: &Router, uri: &str, user: i64, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), Some(body)).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string()
}
