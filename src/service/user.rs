//! Users and permission grants.

use crate::error::AppError;
use crate::models::{CreateUser, Permission, User};
use crate::service::validation::check_user;
use sqlx::PgPool;

pub struct UserService;

impl UserService {
    /// Create a user and grant the listed permissions in one transaction.
    pub async fn create(pool: &PgPool, form: &CreateUser) -> Result<User, AppError> {
        check_user(form)?;
        let mut tx = pool.begin().await?;
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username) VALUES ($1)
             ON CONFLICT (username) DO NOTHING
             RETURNING id, username",
        )
        .bind(&form.username)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("username '{}' is taken", form.username)))?;
        for permission in &form.permissions {
            sqlx::query("INSERT INTO user_permissions (user_id, codename) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(user.id)
                .bind(permission.codename())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(user)
    }

    pub async fn find(pool: &PgPool, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn grant(pool: &PgPool, user_id: i64, permission: Permission) -> Result<(), AppError> {
        sqlx::query("INSERT INTO user_permissions (user_id, codename) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(user_id)
            .bind(permission.codename())
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Granted permissions. Codenames the application no longer knows are skipped.
    pub async fn permissions(pool: &PgPool, user_id: i64) -> Result<Vec<Permission>, AppError> {
        let codenames: Vec<String> =
            sqlx::query_scalar("SELECT codename FROM user_permissions WHERE user_id = $1 ORDER BY codename")
                .bind(user_id)
                .fetch_all(pool)
                .await?;
        Ok(codenames
            .iter()
            .filter_map(|c| match c.parse::<Permission>() {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::warn!(user_id, error = %e, "ignoring permission grant");
                    None
                }
            })
            .collect())
    }
}
