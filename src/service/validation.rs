//! Form validation. Every rule violation is collected so a rejected form reports all of
//! its problems at once.

use crate::error::AppError;
use crate::models::{CreateGpa, CreateInstance, CreateScholarshipType, CreateStudent, CreateUser, DonorForm, ScholarshipForm};
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;

/// Largest value a `NUMERIC(3, 2)` column holds.
const MAX_GRADE: Decimal = Decimal::from_parts(999, 0, 0, false, 2);

fn single_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\r\n]*$").expect("static pattern"))
}

fn username_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w.@+-]+$").expect("static pattern"))
}

#[derive(Default)]
pub struct RequestValidator {
    errors: Vec<String>,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required text: non-blank and at most `max` characters.
    pub fn text(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(format!("{} is required", field));
        } else if value.chars().count() > max {
            self.errors.push(format!("{} must be at most {} characters", field, max));
        }
        self
    }

    pub fn pattern(&mut self, field: &str, value: &str, re: &Regex, message: &str) -> &mut Self {
        if !re.is_match(value) {
            self.errors.push(format!("{} {}", field, message));
        }
        self
    }

    /// Decimal with at most two fractional digits in `[min, MAX_GRADE]`; `min` is
    /// exclusive when `exclusive_min` is set.
    pub fn grade(&mut self, field: &str, value: Decimal, min: Decimal, exclusive_min: bool) -> &mut Self {
        let too_low = if exclusive_min { value <= min } else { value < min };
        if too_low {
            let bound = if exclusive_min { "greater than" } else { "at least" };
            self.errors.push(format!("{} must be {} {}", field, bound, min));
        } else if value > MAX_GRADE {
            self.errors.push(format!("{} must be at most {}", field, MAX_GRADE));
        } else if value.normalize().scale() > 2 {
            self.errors.push(format!("{} must have at most 2 decimal places", field));
        }
        self
    }

    pub fn date_order(&mut self, earlier: (&str, Option<NaiveDate>), later: (&str, Option<NaiveDate>)) -> &mut Self {
        if let (Some(a), Some(b)) = (earlier.1, later.1) {
            if b < a {
                self.errors.push(format!("{} must not be before {}", later.0, earlier.0));
            }
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.errors).join("; ")))
        }
    }
}

pub fn check_donor(form: &DonorForm) -> Result<(), AppError> {
    RequestValidator::new()
        .text("first_name", &form.first_name, 100)
        .text("last_name", &form.last_name, 100)
        .text("description", &form.description, usize::MAX)
        .date_order(("date_of_birth", form.date_of_birth), ("date_of_death", form.date_of_death))
        .finish()
}

pub fn check_scholarship(form: &ScholarshipForm) -> Result<(), AppError> {
    RequestValidator::new()
        .text("name", &form.name, 200)
        .text("summary", &form.summary, 1000)
        .text("value", &form.value, 13)
        .pattern("value", &form.value, single_line(), "must be a single line")
        .finish()
}

pub fn check_type(form: &CreateScholarshipType) -> Result<(), AppError> {
    RequestValidator::new().text("name", &form.name, 200).finish()
}

pub fn check_gpa(form: &CreateGpa) -> Result<(), AppError> {
    RequestValidator::new()
        .grade("grade", form.grade, Decimal::ZERO, true)
        .finish()
}

pub fn check_student(form: &CreateStudent) -> Result<(), AppError> {
    RequestValidator::new()
        .text("first_name", &form.first_name, 100)
        .text("last_name", &form.last_name, 100)
        .grade("gpa", form.gpa, Decimal::ZERO, false)
        .finish()
}

pub fn check_instance(form: &CreateInstance) -> Result<(), AppError> {
    RequestValidator::new().text("imprint", &form.imprint, 200).finish()
}

pub fn check_user(form: &CreateUser) -> Result<(), AppError> {
    RequestValidator::new()
        .text("username", &form.username, 150)
        .pattern("username", &form.username, username_pattern(), "may contain only letters, digits and @/./+/-/_")
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn donor() -> DonorForm {
        DonorForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            description: "Patron of analytical engines".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1815, 12, 10),
            date_of_death: NaiveDate::from_ymd_opt(1852, 11, 27),
        }
    }

    #[test]
    fn accepts_valid_donor() {
        assert!(check_donor(&donor()).is_ok());
    }

    #[test]
    fn collects_every_donor_problem() {
        let mut form = donor();
        form.first_name = "  ".into();
        form.date_of_death = NaiveDate::from_ymd_opt(1800, 1, 1);
        let err = check_donor(&form).unwrap_err().to_string();
        assert!(err.contains("first_name is required"), "{err}");
        assert!(err.contains("date_of_death must not be before date_of_birth"), "{err}");
    }

    #[test]
    fn gpa_grade_must_be_positive_with_two_places() {
        assert!(check_gpa(&CreateGpa { grade: dec("3.50") }).is_ok());
        assert!(check_gpa(&CreateGpa { grade: dec("9.99") }).is_ok());
        assert!(check_gpa(&CreateGpa { grade: dec("0") }).is_err());
        assert!(check_gpa(&CreateGpa { grade: dec("-1.5") }).is_err());
        assert!(check_gpa(&CreateGpa { grade: dec("10.00") }).is_err());
        assert!(check_gpa(&CreateGpa { grade: dec("3.125") }).is_err());
    }

    #[test]
    fn student_gpa_may_be_zero() {
        let form = CreateStudent {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            gpa: Decimal::ZERO,
        };
        assert!(check_student(&form).is_ok());
    }

    #[test]
    fn scholarship_value_is_short_single_line() {
        let mut form = ScholarshipForm {
            name: "Merit Award".into(),
            donor_id: None,
            summary: "For top marks".into(),
            value: "$5,000".into(),
            type_ids: vec![],
            gpa_id: None,
        };
        assert!(check_scholarship(&form).is_ok());
        form.value = "$5,000\n/year".into();
        assert!(check_scholarship(&form).is_err());
        form.value = "$1,000,000,000.00".into();
        assert!(check_scholarship(&form).is_err());
    }

    #[test]
    fn username_rejects_spaces() {
        let form = CreateUser {
            username: "ada lovelace".into(),
            permissions: vec![],
        };
        assert!(check_user(&form).is_err());
    }
}
