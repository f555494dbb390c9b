//! Users and their permission grants. Authentication itself happens upstream; the
//! archive only resolves a user id to a record and its grants.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::CAN_MARK_AWARDED;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// Capabilities checked by the mutation routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    AddDonor,
    ChangeDonor,
    DeleteDonor,
    AddScholarship,
    ChangeScholarship,
    DeleteScholarship,
    CanMarkAwarded,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::AddDonor,
        Permission::ChangeDonor,
        Permission::DeleteDonor,
        Permission::AddScholarship,
        Permission::ChangeScholarship,
        Permission::DeleteScholarship,
        Permission::CanMarkAwarded,
    ];

    pub fn codename(&self) -> &'static str {
        match self {
            Permission::AddDonor => "add_donor",
            Permission::ChangeDonor => "change_donor",
            Permission::DeleteDonor => "delete_donor",
            Permission::AddScholarship => "add_scholarship",
            Permission::ChangeScholarship => "change_scholarship",
            Permission::DeleteScholarship => "delete_scholarship",
            Permission::CanMarkAwarded => CAN_MARK_AWARDED,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.codename())
    }
}

#[derive(Debug, Error)]
#[error("unknown permission '{0}'")]
pub struct ParsePermissionError(pub String);

impl FromStr for Permission {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.codename() == s)
            .ok_or_else(|| ParsePermissionError(s.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub username: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
}
