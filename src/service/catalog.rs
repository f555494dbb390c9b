//! Lookup tables referenced by scholarships (types and GPA thresholds), plus archive-wide counts.

use crate::error::AppError;
use crate::models::{ApplicationStatus, ArchiveCounts, CreateGpa, CreateScholarshipType, Gpa, ScholarshipType};
use crate::service::validation::{check_gpa, check_type};
use sqlx::PgPool;

pub struct CatalogService;

impl CatalogService {
    pub async fn create_type(pool: &PgPool, form: &CreateScholarshipType) -> Result<ScholarshipType, AppError> {
        check_type(form)?;
        let row = sqlx::query_as::<_, ScholarshipType>("INSERT INTO types (name) VALUES ($1) RETURNING id, name")
            .bind(form.name.trim())
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    pub async fn list_types(pool: &PgPool) -> Result<Vec<ScholarshipType>, AppError> {
        let rows = sqlx::query_as::<_, ScholarshipType>("SELECT id, name FROM types ORDER BY name, id")
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Removing a type only unlinks it from scholarships.
    pub async fn delete_type(pool: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM types WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("type", id));
        }
        Ok(())
    }

    pub async fn create_gpa(pool: &PgPool, form: &CreateGpa) -> Result<Gpa, AppError> {
        check_gpa(form)?;
        let row = sqlx::query_as::<_, Gpa>("INSERT INTO gpas (grade) VALUES ($1) RETURNING id, grade")
            .bind(form.grade)
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    pub async fn find_gpa(pool: &PgPool, id: i64) -> Result<Option<Gpa>, AppError> {
        let row = sqlx::query_as::<_, Gpa>("SELECT id, grade FROM gpas WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Scholarships requiring this GPA keep existing with `gpa_id` cleared.
    pub async fn delete_gpa(pool: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM gpas WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("gpa", id));
        }
        Ok(())
    }

    /// Record counts for the home page.
    pub async fn counts(pool: &PgPool) -> Result<ArchiveCounts, AppError> {
        let counts = sqlx::query_as::<_, ArchiveCounts>(
            "SELECT
                (SELECT COUNT(*) FROM scholarships) AS scholarships,
                (SELECT COUNT(*) FROM scholarship_instances) AS instances,
                (SELECT COUNT(*) FROM scholarship_instances WHERE status = $1) AS instances_available,
                (SELECT COUNT(*) FROM donors) AS donors,
                (SELECT COUNT(*) FROM students) AS students",
        )
        .bind(ApplicationStatus::Available)
        .fetch_one(pool)
        .await?;
        Ok(counts)
    }
}
