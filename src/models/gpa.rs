//! Minimum-grade threshold referenced by scholarships.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Gpa {
    pub id: i64,
    pub grade: Decimal,
}

impl fmt::Display for Gpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.grade)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGpa {
    pub grade: Decimal,
}
