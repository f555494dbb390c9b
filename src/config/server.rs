//! Server settings. Every field has a local-development default; override via environment
//! variables (a `.env` file is honoured by the server binary through `dotenvy`).

use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/scholarship_archive";
pub const DEFAULT_PAGE_LIMIT: u32 = 100;
/// Hard cap on `?limit=` for every list page.
pub const MAX_PAGE_LIMIT: u32 = 1000;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    /// Request bodies above this size are rejected with 413.
    pub body_limit_bytes: usize,
    /// Default page size for list pages when `?limit=` is absent.
    pub page_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            database_url: DEFAULT_DATABASE_URL.into(),
            host: "0.0.0.0".into(),
            port: 3000,
            max_connections: 5,
            body_limit_bytes: 64 * 1024,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl ServerConfig {
    /// | Env Var            | Default                                    |
    /// |--------------------|--------------------------------------------|
    /// | `DATABASE_URL`     | `postgres://localhost/scholarship_archive` |
    /// | `HOST`             | `0.0.0.0`                                  |
    /// | `PORT`             | `3000`                                     |
    /// | `MAX_CONNECTIONS`  | `5`                                        |
    /// | `BODY_LIMIT_BYTES` | `65536`                                    |
    /// | `PAGE_LIMIT`       | `100`                                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys fall back to defaults; set but
    /// unparsable keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();
        let page_limit = parse_or(&lookup, "PAGE_LIMIT", defaults.page_limit)?;
        if page_limit == 0 || page_limit > MAX_PAGE_LIMIT {
            return Err(ConfigError::Invalid {
                key: "PAGE_LIMIT",
                value: page_limit.to_string(),
            });
        }
        Ok(ServerConfig {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            max_connections: parse_or(&lookup, "MAX_CONNECTIONS", defaults.max_connections)?,
            body_limit_bytes: parse_or(&lookup, "BODY_LIMIT_BYTES", defaults.body_limit_bytes)?,
            page_limit,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
