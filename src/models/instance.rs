//! Scholarship instance: one concrete, applicable offering of a scholarship.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::decode::Decode;
use sqlx::encode::{Encode, IsNull};
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef, Postgres};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Permission codename that allows marking instance status and viewing every application.
pub const CAN_MARK_AWARDED: &str = "can_mark_awarded";

/// Application status of an instance. Stored as lowercase text; the legacy single-letter
/// codes (`d`, `o`, `a`, `r`) are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    #[serde(alias = "d")]
    Applied,
    #[serde(alias = "o")]
    Waitlist,
    #[serde(alias = "a")]
    Available,
    #[serde(alias = "r")]
    Rewarded,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Waitlist,
        ApplicationStatus::Available,
        ApplicationStatus::Rewarded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Waitlist => "waitlist",
            ApplicationStatus::Available => "available",
            ApplicationStatus::Rewarded => "rewarded",
        }
    }

    pub fn code(&self) -> char {
        match self {
            ApplicationStatus::Applied => 'd',
            ApplicationStatus::Waitlist => 'o',
            ApplicationStatus::Available => 'a',
            ApplicationStatus::Rewarded => 'r',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Waitlist => "Waitlist",
            ApplicationStatus::Available => "Available",
            ApplicationStatus::Rewarded => "Rewarded",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("unknown application status '{0}'")]
pub struct ParseStatusError(pub String);

impl FromStr for ApplicationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ApplicationStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == lower || (lower.len() == 1 && lower.starts_with(st.code())))
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

impl sqlx::Type<Postgres> for ApplicationStatus {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Postgres> for ApplicationStatus {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> Decode<'r, Postgres> for ApplicationStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<'r, Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

/// A row from `scholarship_instances`, joined with its scholarship's name.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ScholarshipInstance {
    pub id: Uuid,
    pub scholarship_id: Option<i64>,
    pub scholarship_name: Option<String>,
    pub imprint: String,
    pub deadline: Option<NaiveDate>,
    pub applicant_id: Option<i64>,
    pub status: ApplicationStatus,
}

impl ScholarshipInstance {
    /// True iff a deadline is set and it is strictly before `today`.
    pub fn is_past_deadline_on(&self, today: NaiveDate) -> bool {
        self.deadline.is_some_and(|deadline| deadline < today)
    }
}

impl fmt::Display for ScholarshipInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scholarship_name {
            Some(name) => write!(f, "{} ({})", self.id, name),
            None => write!(f, "{} (no scholarship)", self.id),
        }
    }
}

/// Local calendar date used for deadline comparisons.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInstance {
    pub scholarship_id: Option<i64>,
    pub imprint: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub status: ApplicationStatus,
}

/// Instance as rendered on pages: row fields plus the derived deadline flag.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceView {
    #[serde(flatten)]
    pub instance: ScholarshipInstance,
    pub is_pastdeadline: bool,
    pub display: String,
}

impl InstanceView {
    pub fn on(instance: ScholarshipInstance, today: NaiveDate) -> Self {
        InstanceView {
            is_pastdeadline: instance.is_past_deadline_on(today),
            display: instance.to_string(),
            instance,
        }
    }
}

impl From<ScholarshipInstance> for InstanceView {
    fn from(instance: ScholarshipInstance) -> Self {
        InstanceView::on(instance, today())
    }
}

/// Body of the apply form.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyForm {
    pub student_id: Uuid,
}

/// Body of the mark-status form.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusForm {
    pub status: ApplicationStatus,
}
