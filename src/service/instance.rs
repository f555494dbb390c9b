//! Scholarship instances: listings, the apply flow and status marking.

use crate::error::AppError;
use crate::models::{ApplicationStatus, CreateInstance, ScholarshipInstance, Student};
use crate::service::validation::check_instance;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// Instance columns joined with the scholarship name; expects aliases `i` and `s`.
const SELECT: &str = "SELECT i.id, i.scholarship_id, s.name AS scholarship_name, i.imprint, i.deadline,
        i.applicant_id, i.status
 FROM scholarship_instances i
 LEFT JOIN scholarships s ON s.id = i.scholarship_id";

/// Deadline ascending; instances without a deadline come last.
const ORDER: &str = "ORDER BY i.deadline ASC NULLS LAST, i.id";

pub struct InstanceService;

impl InstanceService {
    pub async fn create(pool: &PgPool, form: &CreateInstance) -> Result<ScholarshipInstance, AppError> {
        check_instance(form)?;
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO scholarship_instances (id, scholarship_id, imprint, deadline, status)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(form.scholarship_id)
        .bind(form.imprint.trim())
        .bind(form.deadline)
        .bind(form.status)
        .execute(pool)
        .await?;
        tracing::info!(instance_id = %id, scholarship_id = ?form.scholarship_id, "instance created");
        Self::get(pool, id).await
    }

    pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<ScholarshipInstance>, AppError> {
        let sql = format!("{SELECT} WHERE i.id = $1");
        let row = sqlx::query_as::<_, ScholarshipInstance>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<ScholarshipInstance, AppError> {
        Self::find(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("scholarship instance", id))
    }

    pub async fn for_scholarship(pool: &PgPool, scholarship_id: i64) -> Result<Vec<ScholarshipInstance>, AppError> {
        let sql = format!("{SELECT} WHERE i.scholarship_id = $1 {ORDER}");
        let rows = sqlx::query_as::<_, ScholarshipInstance>(&sql)
            .bind(scholarship_id)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Instances whose applicant is `user_id`.
    pub async fn applied_by(pool: &PgPool, user_id: i64, limit: i64, offset: i64) -> Result<Vec<ScholarshipInstance>, AppError> {
        let sql = format!("{SELECT} WHERE i.applicant_id = $1 {ORDER} LIMIT $2 OFFSET $3");
        let rows = sqlx::query_as::<_, ScholarshipInstance>(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Instances applied for by any user.
    pub async fn all_applied(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<ScholarshipInstance>, AppError> {
        let sql = format!("{SELECT} WHERE i.applicant_id IS NOT NULL {ORDER} LIMIT $1 OFFSET $2");
        let rows = sqlx::query_as::<_, ScholarshipInstance>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Students who applied to the instance, by last name then first name.
    pub async fn applicants(pool: &PgPool, instance_id: Uuid) -> Result<Vec<Student>, AppError> {
        let rows = sqlx::query_as::<_, Student>(
            "SELECT st.id, st.first_name, st.last_name, st.gpa
             FROM instance_applicants ia
             JOIN students st ON st.id = ia.student_id
             WHERE ia.instance_id = $1
             ORDER BY st.last_name, st.first_name, st.id",
        )
        .bind(instance_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Apply `student_id` to the instance on behalf of `user_id`.
    ///
    /// The instance row is locked for the duration. Rejects past-deadline instances
    /// (validation) and already rewarded ones (conflict). Membership is idempotent:
    /// applying the same student twice leaves one join row. On success the status becomes
    /// Applied and the applicant becomes `user_id`.
    pub async fn apply(
        pool: &PgPool,
        instance_id: Uuid,
        student_id: Uuid,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<ScholarshipInstance, AppError> {
        let mut tx = pool.begin().await?;
        let (status, deadline): (ApplicationStatus, Option<NaiveDate>) =
            sqlx::query_as("SELECT status, deadline FROM scholarship_instances WHERE id = $1 FOR UPDATE")
                .bind(instance_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::not_found("scholarship instance", instance_id))?;

        if deadline.is_some_and(|d| d < today) {
            return Err(AppError::Validation(format!(
                "the application deadline for {} has passed",
                instance_id
            )));
        }
        if status == ApplicationStatus::Rewarded {
            return Err(AppError::Conflict(format!("scholarship instance {} was already rewarded", instance_id)));
        }

        let (student_exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
            .bind(student_id)
            .fetch_one(&mut *tx)
            .await?;
        if !student_exists {
            return Err(AppError::Validation(format!("student {} does not exist", student_id)));
        }

        let inserted = sqlx::query(
            "INSERT INTO instance_applicants (instance_id, student_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(instance_id)
        .bind(student_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query("UPDATE scholarship_instances SET status = $2, applicant_id = $3 WHERE id = $1")
            .bind(instance_id)
            .bind(ApplicationStatus::Applied)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(
            instance_id = %instance_id,
            student_id = %student_id,
            user_id,
            new_membership = inserted > 0,
            "application recorded"
        );
        Self::get(pool, instance_id).await
    }

    pub async fn set_status(pool: &PgPool, id: Uuid, status: ApplicationStatus) -> Result<ScholarshipInstance, AppError> {
        let result = sqlx::query("UPDATE scholarship_instances SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("scholarship instance", id));
        }
        tracing::info!(instance_id = %id, status = status.as_str(), "instance status marked");
        Self::get(pool, id).await
    }
}
