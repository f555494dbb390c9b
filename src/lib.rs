//! Scholarship archive: donors, scholarships, scholarship instances and student
//! applications served as JSON pages over PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::{app, archive_routes, common_routes};
pub use state::AppState;
pub use store::{connect, ensure_database_exists};
