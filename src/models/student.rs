//! Student (applicant) entity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

use super::person_display;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gpa: Decimal,
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&person_display(&self.first_name, &self.last_name))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudent {
    pub first_name: String,
    pub last_name: String,
    pub gpa: Decimal,
}

/// A student on the applicants page together with the instances they applied to.
#[derive(Debug, Clone, Serialize)]
pub struct Applicant {
    #[serde(flatten)]
    pub student: Student,
    pub display: String,
    pub applied_scholarships: Vec<Uuid>,
}
