//! Donor CRUD against PostgreSQL.

use crate::error::AppError;
use crate::models::{Donor, DonorForm, Scholarship};
use crate::service::validation::check_donor;
use sqlx::PgPool;

const COLUMNS: &str = "id, first_name, last_name, description, date_of_birth, date_of_death";

pub struct DonorService;

impl DonorService {
    /// Donors ordered by last name, then first name.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Donor>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM donors ORDER BY last_name, first_name, id LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, Donor>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Donor>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM donors WHERE id = $1");
        let row = sqlx::query_as::<_, Donor>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn get(pool: &PgPool, id: i64) -> Result<Donor, AppError> {
        Self::find(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("donor", id))
    }

    pub async fn create(pool: &PgPool, form: &DonorForm) -> Result<Donor, AppError> {
        check_donor(form)?;
        let sql = format!(
            "INSERT INTO donors (first_name, last_name, description, date_of_birth, date_of_death)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let donor = sqlx::query_as::<_, Donor>(&sql)
            .bind(form.first_name.trim())
            .bind(form.last_name.trim())
            .bind(&form.description)
            .bind(form.date_of_birth)
            .bind(form.date_of_death)
            .fetch_one(pool)
            .await?;
        tracing::info!(donor_id = donor.id, "donor created");
        Ok(donor)
    }

    /// Replace every editable field. The id is never written.
    pub async fn update(pool: &PgPool, id: i64, form: &DonorForm) -> Result<Donor, AppError> {
        check_donor(form)?;
        let sql = format!(
            "UPDATE donors SET
                first_name = $2,
                last_name = $3,
                description = $4,
                date_of_birth = $5,
                date_of_death = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let donor = sqlx::query_as::<_, Donor>(&sql)
            .bind(id)
            .bind(form.first_name.trim())
            .bind(form.last_name.trim())
            .bind(&form.description)
            .bind(form.date_of_birth)
            .bind(form.date_of_death)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::not_found("donor", id))?;
        tracing::info!(donor_id = id, "donor updated");
        Ok(donor)
    }

    /// Delete a donor. Scholarships it funded keep existing with `donor_id` cleared
    /// (`ON DELETE SET NULL`).
    pub async fn delete(pool: &PgPool, id: i64) -> Result<Donor, AppError> {
        let sql = format!("DELETE FROM donors WHERE id = $1 RETURNING {COLUMNS}");
        let donor = sqlx::query_as::<_, Donor>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::not_found("donor", id))?;
        tracing::info!(donor_id = id, "donor deleted");
        Ok(donor)
    }

    /// Scholarships funded by the donor, by id.
    pub async fn scholarships(pool: &PgPool, donor_id: i64) -> Result<Vec<Scholarship>, AppError> {
        let rows = sqlx::query_as::<_, Scholarship>(
            "SELECT id, name, donor_id, summary, value, gpa_id FROM scholarships WHERE donor_id = $1 ORDER BY id",
        )
        .bind(donor_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }
}
