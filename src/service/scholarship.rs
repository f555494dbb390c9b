//! Scholarship CRUD, including the scholarship↔type join table.

use crate::error::AppError;
use crate::models::{
    display_type, donor_url, person_display, scholarship_url, DonorRef, InstanceView, Scholarship, ScholarshipDetail,
    ScholarshipForm, ScholarshipSummary, ScholarshipType,
};
use crate::service::validation::check_scholarship;
use crate::service::{CatalogService, DonorService, InstanceService};
use sqlx::{FromRow, PgConnection, PgPool};
use std::collections::{BTreeSet, HashMap};

const COLUMNS: &str = "id, name, donor_id, summary, value, gpa_id";

#[derive(FromRow)]
struct SummaryRow {
    id: i64,
    name: String,
    value: String,
    donor_id: Option<i64>,
    donor_first_name: Option<String>,
    donor_last_name: Option<String>,
}

pub struct ScholarshipService;

impl ScholarshipService {
    /// Scholarships by id, each with its donor reference and up to three type names.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<ScholarshipSummary>, AppError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            "SELECT s.id, s.name, s.value, s.donor_id,
                    d.first_name AS donor_first_name, d.last_name AS donor_last_name
             FROM scholarships s
             LEFT JOIN donors d ON d.id = s.donor_id
             ORDER BY s.id
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut types = Self::types_for(pool, &ids).await?;
        Ok(rows
            .into_iter()
            .map(|r| {
                let donor = match (r.donor_id, r.donor_first_name, r.donor_last_name) {
                    (Some(id), Some(first), Some(last)) => Some(DonorRef {
                        id,
                        display: person_display(&first, &last),
                        url: donor_url(id),
                    }),
                    _ => None,
                };
                let own_types = types.remove(&r.id).unwrap_or_default();
                ScholarshipSummary {
                    url: scholarship_url(r.id),
                    id: r.id,
                    name: r.name,
                    value: r.value,
                    donor,
                    display_type: display_type(&own_types),
                }
            })
            .collect())
    }

    pub async fn find(pool: &PgPool, id: i64) -> Result<Option<Scholarship>, AppError> {
        let sql = format!("SELECT {COLUMNS} FROM scholarships WHERE id = $1");
        let row = sqlx::query_as::<_, Scholarship>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn get(pool: &PgPool, id: i64) -> Result<Scholarship, AppError> {
        Self::find(pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("scholarship", id))
    }

    /// Detail page: scholarship, donor, GPA threshold, types and its instances.
    pub async fn detail(pool: &PgPool, id: i64) -> Result<ScholarshipDetail, AppError> {
        let scholarship = Self::get(pool, id).await?;
        let donor = match scholarship.donor_id {
            Some(donor_id) => DonorService::find(pool, donor_id).await?.map(|d| DonorRef::from(&d)),
            None => None,
        };
        let gpa = match scholarship.gpa_id {
            Some(gpa_id) => CatalogService::find_gpa(pool, gpa_id).await?.map(|g| g.grade),
            None => None,
        };
        let types = Self::types_for(pool, &[id]).await?.remove(&id).unwrap_or_default();
        let instances = InstanceService::for_scholarship(pool, id)
            .await?
            .into_iter()
            .map(InstanceView::from)
            .collect();
        Ok(ScholarshipDetail {
            display_type: display_type(&types),
            scholarship,
            donor,
            gpa,
            types,
            instances,
        })
    }

    pub async fn create(pool: &PgPool, form: &ScholarshipForm) -> Result<Scholarship, AppError> {
        check_scholarship(form)?;
        let type_ids = dedup(&form.type_ids);
        let mut tx = pool.begin().await?;
        check_references(&mut tx, form, &type_ids).await?;
        let sql = format!(
            "INSERT INTO scholarships (name, donor_id, summary, value, gpa_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let scholarship = sqlx::query_as::<_, Scholarship>(&sql)
            .bind(form.name.trim())
            .bind(form.donor_id)
            .bind(&form.summary)
            .bind(form.value.trim())
            .bind(form.gpa_id)
            .fetch_one(&mut *tx)
            .await?;
        replace_types(&mut tx, scholarship.id, &type_ids).await?;
        tx.commit().await?;
        tracing::info!(scholarship_id = scholarship.id, types = type_ids.len(), "scholarship created");
        Ok(scholarship)
    }

    /// Replace every editable field and the type set in one transaction. The id is never written.
    pub async fn update(pool: &PgPool, id: i64, form: &ScholarshipForm) -> Result<Scholarship, AppError> {
        check_scholarship(form)?;
        let type_ids = dedup(&form.type_ids);
        let mut tx = pool.begin().await?;
        check_references(&mut tx, form, &type_ids).await?;
        let sql = format!(
            "UPDATE scholarships SET
                name = $2,
                donor_id = $3,
                summary = $4,
                value = $5,
                gpa_id = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let scholarship = sqlx::query_as::<_, Scholarship>(&sql)
            .bind(id)
            .bind(form.name.trim())
            .bind(form.donor_id)
            .bind(&form.summary)
            .bind(form.value.trim())
            .bind(form.gpa_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found("scholarship", id))?;
        replace_types(&mut tx, id, &type_ids).await?;
        tx.commit().await?;
        tracing::info!(scholarship_id = id, "scholarship updated");
        Ok(scholarship)
    }

    /// Delete a scholarship. Its instances survive with `scholarship_id` cleared; its
    /// type links are removed.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<Scholarship, AppError> {
        let sql = format!("DELETE FROM scholarships WHERE id = $1 RETURNING {COLUMNS}");
        let scholarship = sqlx::query_as::<_, Scholarship>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::not_found("scholarship", id))?;
        tracing::info!(scholarship_id = id, "scholarship deleted");
        Ok(scholarship)
    }

    /// Types of each listed scholarship, ordered by type id.
    pub async fn types_for(pool: &PgPool, ids: &[i64]) -> Result<HashMap<i64, Vec<ScholarshipType>>, AppError> {
        let mut out: HashMap<i64, Vec<ScholarshipType>> = HashMap::new();
        if ids.is_empty() {
            return Ok(out);
        }
        let rows = sqlx::query_as::<_, (i64, i64, String)>(
            "SELECT st.scholarship_id, t.id, t.name
             FROM scholarship_types st
             JOIN types t ON t.id = st.type_id
             WHERE st.scholarship_id = ANY($1)
             ORDER BY st.scholarship_id, t.id",
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;
        for (scholarship_id, id, name) in rows {
            out.entry(scholarship_id).or_default().push(ScholarshipType { id, name });
        }
        Ok(out)
    }
}

fn dedup(ids: &[i64]) -> Vec<i64> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Referenced donor, GPA and types must exist; a dangling id is a form error, not a 500.
async fn check_references(conn: &mut PgConnection, form: &ScholarshipForm, type_ids: &[i64]) -> Result<(), AppError> {
    if let Some(donor_id) = form.donor_id {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM donors WHERE id = $1)")
            .bind(donor_id)
            .fetch_one(&mut *conn)
            .await?;
        if !exists {
            return Err(AppError::Validation(format!("donor {} does not exist", donor_id)));
        }
    }
    if let Some(gpa_id) = form.gpa_id {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM gpas WHERE id = $1)")
            .bind(gpa_id)
            .fetch_one(&mut *conn)
            .await?;
        if !exists {
            return Err(AppError::Validation(format!("gpa {} does not exist", gpa_id)));
        }
    }
    if !type_ids.is_empty() {
        let found: Vec<i64> = sqlx::query_scalar("SELECT id FROM types WHERE id = ANY($1)")
            .bind(type_ids)
            .fetch_all(&mut *conn)
            .await?;
        let missing: Vec<String> = type_ids
            .iter()
            .filter(|id| !found.contains(*id))
            .map(|id| id.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!("unknown type ids: {}", missing.join(", "))));
        }
    }
    Ok(())
}

async fn replace_types(conn: &mut PgConnection, scholarship_id: i64, type_ids: &[i64]) -> Result<(), AppError> {
    sqlx::query("DELETE FROM scholarship_types WHERE scholarship_id = $1")
        .bind(scholarship_id)
        .execute(&mut *conn)
        .await?;
    if !type_ids.is_empty() {
        sqlx::query(
            "INSERT INTO scholarship_types (scholarship_id, type_id)
             SELECT $1, UNNEST($2::BIGINT[])",
        )
        .bind(scholarship_id)
        .bind(type_ids)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
