//! Database bootstrap: create the target database when missing and open the pool.

use crate::config::ServerConfig;
use crate::error::{AppError, ConfigError};
use sqlx::postgres::PgPoolOptions;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// Connect to the `postgres` maintenance database on the same server and create the
/// database named in `database_url` if it does not exist yet.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url).map_err(|_| invalid_url(database_url))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

pub async fn connect(config: &ServerConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

fn invalid_url(url: &str) -> AppError {
    ConfigError::Invalid {
        key: "DATABASE_URL",
        value: url.to_string(),
    }
    .into()
}

/// Split `scheme://authority/name?query` into the maintenance URL on the same server and
/// the database name. A URL without a database name is rejected.
fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let authority_start = url.find("://").map(|i| i + 3).ok_or_else(|| invalid_url(url))?;
    let path_start = url[authority_start..]
        .find('/')
        .map(|i| authority_start + i + 1)
        .ok_or_else(|| invalid_url(url))?;
    let db_name = url[path_start..].split('?').next().unwrap_or("").trim();
    if db_name.is_empty() || db_name.contains('/') {
        return Err(invalid_url(url));
    }
    Ok((format!("{}postgres", &url[..path_start]), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
