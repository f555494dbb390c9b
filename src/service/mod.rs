//! Typed CRUD services over the archive tables. Each service owns the SQL for one entity
//! and returns rows as model structs.

mod catalog;
mod donor;
mod instance;
mod scholarship;
mod student;
mod user;
pub mod validation;

pub use catalog::CatalogService;
pub use donor::DonorService;
pub use instance::InstanceService;
pub use scholarship::ScholarshipService;
pub use student::StudentService;
pub use user::UserService;
pub use validation::RequestValidator;

use crate::config::MAX_PAGE_LIMIT;
use serde::Deserialize;

/// `?limit=&offset=` query of every list page.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListParams {
    /// Resolve to `(limit, offset)`; limit falls back to `default_limit` and is capped at
    /// [`MAX_PAGE_LIMIT`].
    pub fn resolve(&self, default_limit: u32) -> (i64, i64) {
        let limit = self.limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_LIMIT);
        (i64::from(limit), i64::from(self.offset.unwrap_or(0)))
    }
}
