//! Resolve the acting user from the `X-User-Id` header. Authentication happens upstream;
//! this only maps the id to a user record and its permission grants.

use crate::error::AppError;
use crate::models::{Permission, User};
use crate::service::UserService;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Header carrying the numeric user id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Identified user. Rejects with 401 when the header is missing, malformed, or names no user.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: User,
    pub permissions: Vec<Permission>,
}

impl CurrentUser {
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// 403 unless the user holds `permission`.
    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.has(permission) {
            Ok(())
        } else {
            tracing::warn!(user_id = self.user.id, permission = permission.codename(), "permission denied");
            Err(AppError::PermissionDenied(format!("'{}' required", permission)))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Unauthenticated(format!("missing {} header", USER_ID_HEADER)))?;
        let id: i64 = raw
            .parse()
            .map_err(|_| AppError::Unauthenticated(format!("malformed {} header", USER_ID_HEADER)))?;
        let user = UserService::find(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::Unauthenticated(format!("unknown user {}", id)))?;
        let permissions = UserService::permissions(&state.pool, id).await?;
        Ok(CurrentUser { user, permissions })
    }
}
