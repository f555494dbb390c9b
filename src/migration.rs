//! Apply the archive schema to the database: tables, join tables, foreign keys and indexes.
//! Order follows PostgreSQL dependencies (referenced tables first). Every statement is
//! idempotent so this runs on each startup.

use crate::error::AppError;
use crate::models::ApplicationStatus;
use sqlx::PgPool;

const USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    username VARCHAR(150) NOT NULL UNIQUE
)"#;

const USER_PERMISSIONS: &str = r#"
CREATE TABLE IF NOT EXISTS user_permissions (
    user_id BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
    codename TEXT NOT NULL,
    PRIMARY KEY (user_id, codename)
)"#;

const TYPES: &str = r#"
CREATE TABLE IF NOT EXISTS types (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(200) NOT NULL
)"#;

const GPAS: &str = r#"
CREATE TABLE IF NOT EXISTS gpas (
    id BIGSERIAL PRIMARY KEY,
    grade NUMERIC(3, 2) NOT NULL CHECK (grade > 0)
)"#;

const DONORS: &str = r#"
CREATE TABLE IF NOT EXISTS donors (
    id BIGSERIAL PRIMARY KEY,
    first_name VARCHAR(100) NOT NULL,
    last_name VARCHAR(100) NOT NULL,
    description TEXT NOT NULL,
    date_of_birth DATE,
    date_of_death DATE
)"#;

const SCHOLARSHIPS: &str = r#"
CREATE TABLE IF NOT EXISTS scholarships (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(200) NOT NULL,
    donor_id BIGINT REFERENCES donors (id) ON DELETE SET NULL,
    summary VARCHAR(1000) NOT NULL,
    value VARCHAR(13) NOT NULL,
    gpa_id BIGINT REFERENCES gpas (id) ON DELETE SET NULL
)"#;

const SCHOLARSHIP_TYPES: &str = r#"
CREATE TABLE IF NOT EXISTS scholarship_types (
    scholarship_id BIGINT NOT NULL REFERENCES scholarships (id) ON DELETE CASCADE,
    type_id BIGINT NOT NULL REFERENCES types (id) ON DELETE CASCADE,
    PRIMARY KEY (scholarship_id, type_id)
)"#;

const STUDENTS: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    id UUID PRIMARY KEY,
    first_name VARCHAR(100) NOT NULL,
    last_name VARCHAR(100) NOT NULL,
    gpa NUMERIC(3, 2) NOT NULL CHECK (gpa >= 0)
)"#;

const INSTANCE_APPLICANTS: &str = r#"
CREATE TABLE IF NOT EXISTS instance_applicants (
    instance_id UUID NOT NULL REFERENCES scholarship_instances (id) ON DELETE CASCADE,
    student_id UUID NOT NULL REFERENCES students (id) ON DELETE CASCADE,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (instance_id, student_id)
)"#;

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS donors_name_idx ON donors (last_name, first_name)",
    "CREATE INDEX IF NOT EXISTS students_name_idx ON students (last_name, first_name)",
    "CREATE INDEX IF NOT EXISTS scholarship_instances_deadline_idx ON scholarship_instances (deadline)",
    "CREATE INDEX IF NOT EXISTS scholarship_instances_applicant_idx ON scholarship_instances (applicant_id)",
    "CREATE INDEX IF NOT EXISTS instance_applicants_student_idx ON instance_applicants (student_id)",
];

/// `scholarship_instances` DDL; the status CHECK is generated from [`ApplicationStatus::ALL`]
/// so the column can only ever hold one of the enumerated values.
fn scholarship_instances_ddl() -> String {
    let allowed: Vec<String> = ApplicationStatus::ALL
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect();
    format!(
        r#"
CREATE TABLE IF NOT EXISTS scholarship_instances (
    id UUID PRIMARY KEY,
    scholarship_id BIGINT REFERENCES scholarships (id) ON DELETE SET NULL,
    imprint VARCHAR(200) NOT NULL,
    deadline DATE,
    applicant_id BIGINT REFERENCES users (id) ON DELETE SET NULL,
    status TEXT NOT NULL DEFAULT '{}' CHECK (status IN ({}))
)"#,
        ApplicationStatus::default().as_str(),
        allowed.join(", ")
    )
}

/// Create every archive table, join table and index that does not exist yet.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    let mut statements: Vec<String> = [USERS, USER_PERMISSIONS, TYPES, GPAS, DONORS, SCHOLARSHIPS, SCHOLARSHIP_TYPES]
        .iter()
        .map(|s| s.to_string())
        .collect();
    statements.push(scholarship_instances_ddl());
    statements.push(STUDENTS.to_string());
    statements.push(INSTANCE_APPLICANTS.to_string());
    statements.extend(INDEXES.iter().map(|s| s.to_string()));

    let mut tx = pool.begin().await?;
    for sql in &statements {
        sqlx::query(sql).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!(statements = statements.len(), "archive schema applied");
    Ok(())
}
