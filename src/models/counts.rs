//! Archive-wide record counts shown on the home page.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ArchiveCounts {
    pub scholarships: i64,
    pub instances: i64,
    /// Instances whose status is Available.
    pub instances_available: i64,
    pub donors: i64,
    pub students: i64,
}
