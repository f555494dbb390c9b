//! Scholarship category tag (e.g. Athletic, Merit).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ScholarshipType {
    pub id: i64,
    pub name: String,
}

impl fmt::Display for ScholarshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateScholarshipType {
    pub name: String,
}
