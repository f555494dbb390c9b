//! Donor entity model and form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use super::{person_display, Scholarship};

/// A row from the `donors` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Donor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub description: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Donor {
    pub fn absolute_url(&self) -> String {
        donor_url(self.id)
    }
}

pub fn donor_url(id: i64) -> String {
    format!("/donor/{}", id)
}

impl fmt::Display for Donor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&person_display(&self.first_name, &self.last_name))
    }
}

/// Create/update form. Update replaces every field.
#[derive(Debug, Clone, Deserialize)]
pub struct DonorForm {
    pub first_name: String,
    pub last_name: String,
    pub description: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,
}

/// Reference to a donor as embedded in scholarship pages.
#[derive(Debug, Clone, Serialize)]
pub struct DonorRef {
    pub id: i64,
    pub display: String,
    pub url: String,
}

impl From<&Donor> for DonorRef {
    fn from(d: &Donor) -> Self {
        DonorRef {
            id: d.id,
            display: d.to_string(),
            url: d.absolute_url(),
        }
    }
}

/// Donor detail page: the donor and the scholarships it funds.
#[derive(Debug, Clone, Serialize)]
pub struct DonorDetail {
    #[serde(flatten)]
    pub donor: Donor,
    pub display: String,
    pub scholarships: Vec<Scholarship>,
}
