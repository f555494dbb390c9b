//! Students and the applicants listing.

use crate::error::AppError;
use crate::models::{Applicant, CreateStudent, Student};
use crate::service::validation::check_student;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const COLUMNS: &str = "id, first_name, last_name, gpa";

#[derive(FromRow)]
struct ApplicantRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    gpa: Decimal,
    applied: Vec<Uuid>,
}

pub struct StudentService;

impl StudentService {
    pub async fn create(pool: &PgPool, form: &CreateStudent) -> Result<Student, AppError> {
        check_student(form)?;
        let sql = format!(
            "INSERT INTO students (id, first_name, last_name, gpa) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(Uuid::new_v4())
            .bind(form.first_name.trim())
            .bind(form.last_name.trim())
            .bind(form.gpa)
            .fetch_one(pool)
            .await?;
        Ok(student)
    }

    pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Student>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        let row = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Every student, by last name then first name.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Student>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM students ORDER BY last_name, first_name, id LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, Student>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    /// Students with at least one application, by last name then first name, each with
    /// the instances applied to in application order.
    pub async fn list_applicants(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Applicant>, AppError> {
        let rows = sqlx::query_as::<_, ApplicantRow>(
            "SELECT s.id, s.first_name, s.last_name, s.gpa,
                    ARRAY_AGG(ia.instance_id ORDER BY ia.applied_at, ia.instance_id) AS applied
             FROM students s
             JOIN instance_applicants ia ON ia.student_id = s.id
             GROUP BY s.id
             ORDER BY s.last_name, s.first_name, s.id
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| {
                let student = Student {
                    id: r.id,
                    first_name: r.first_name,
                    last_name: r.last_name,
                    gpa: r.gpa,
                };
                Applicant {
                    display: student.to_string(),
                    student,
                    applied_scholarships: r.applied,
                }
            })
            .collect())
    }
}
