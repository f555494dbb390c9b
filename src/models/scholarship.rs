//! Scholarship entity (the offering template, not a specific applicable instance).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use super::{DonorRef, InstanceView, ScholarshipType};

/// How many type names [`display_type`] shows.
pub const DISPLAY_TYPE_LIMIT: usize = 3;

/// A row from the `scholarships` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Scholarship {
    pub id: i64,
    pub name: String,
    pub donor_id: Option<i64>,
    pub summary: String,
    pub value: String,
    pub gpa_id: Option<i64>,
}

impl Scholarship {
    pub fn absolute_url(&self) -> String {
        scholarship_url(self.id)
    }
}

pub fn scholarship_url(id: i64) -> String {
    format!("/scholarship/{}", id)
}

impl fmt::Display for Scholarship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Names of the first three types, comma separated.
pub fn display_type(types: &[ScholarshipType]) -> String {
    types
        .iter()
        .take(DISPLAY_TYPE_LIMIT)
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Create/update form. `type_ids` replaces the scholarship's type set.
#[derive(Debug, Clone, Deserialize)]
pub struct ScholarshipForm {
    pub name: String,
    #[serde(default)]
    pub donor_id: Option<i64>,
    pub summary: String,
    pub value: String,
    #[serde(default)]
    pub type_ids: Vec<i64>,
    #[serde(default)]
    pub gpa_id: Option<i64>,
}

/// One row of the scholarship list page.
#[derive(Debug, Clone, Serialize)]
pub struct ScholarshipSummary {
    pub id: i64,
    pub name: String,
    pub value: String,
    pub donor: Option<DonorRef>,
    pub display_type: String,
    pub url: String,
}

/// Scholarship detail page.
#[derive(Debug, Clone, Serialize)]
pub struct ScholarshipDetail {
    #[serde(flatten)]
    pub scholarship: Scholarship,
    pub donor: Option<DonorRef>,
    pub gpa: Option<Decimal>,
    pub types: Vec<ScholarshipType>,
    pub display_type: String,
    pub instances: Vec<InstanceView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(id: i64, name: &str) -> ScholarshipType {
        ScholarshipType { id, name: name.into() }
    }

    #[test]
    fn display_type_shows_at_most_three() {
        let types = vec![ty(1, "Merit"), ty(2, "Athletic"), ty(3, "Need"), ty(4, "Arts")];
        assert_eq!(display_type(&types), "Merit, Athletic, Need");
        assert_eq!(display_type(&types[..1]), "Merit");
        assert_eq!(display_type(&[]), "");
    }
}
