//! Alumni directory repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use alumni_core::error::{AppError, ErrorKind};
use alumni_core::result::AppResult;
use alumni_core::types::{PageRequest, PageResponse};
use alumni_entity::alumni::{Alumni, AlumniFields, AlumniYearCount};

use crate::store::AlumniStore;

fn map_email_conflict(e: sqlx::Error, action: &'static str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("alumni_email_key") => {
            AppError::conflict("Alumni with this email already exists")
        }
        _ => AppError::with_source(ErrorKind::Database, action, e),
    }
}

/// Repository for the `alumni` table.
#[derive(Debug, Clone)]
pub struct PgAlumniRepository {
    pool: PgPool,
}

impl PgAlumniRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlumniStore for PgAlumniRepository {
    async fn list(&self, page: PageRequest) -> AppResult<PageResponse<Alumni>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alumni")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count alumni", e))?;

        let items = sqlx::query_as::<_, Alumni>(
            "SELECT * FROM alumni ORDER BY last_name, first_name LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list alumni", e))?;

        Ok(PageResponse::new(items, page, total as u64))
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Alumni>> {
        let pattern = format!("%{query}%");
        sqlx::query_as::<_, Alumni>(
            "SELECT * FROM alumni \
             WHERE first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1 \
                OR current_company ILIKE $1 \
             ORDER BY last_name",
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search alumni", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alumni>> {
        sqlx::query_as::<_, Alumni>("SELECT * FROM alumni WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find alumni", e))
    }

    async fn create(&self, fields: &AlumniFields) -> AppResult<Alumni> {
        sqlx::query_as::<_, Alumni>(
            "INSERT INTO alumni (id, first_name, last_name, email, phone, graduation_year, degree, \
                                 field_of_study, current_company, current_position, city, country) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(fields.graduation_year)
        .bind(&fields.degree)
        .bind(&fields.field_of_study)
        .bind(&fields.current_company)
        .bind(&fields.current_position)
        .bind(&fields.city)
        .bind(&fields.country)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_email_conflict(e, "Failed to create alumni"))
    }

    async fn update(&self, id: Uuid, fields: &AlumniFields) -> AppResult<Alumni> {
        sqlx::query_as::<_, Alumni>(
            "UPDATE alumni SET first_name = $2, last_name = $3, email = $4, phone = $5, \
                               graduation_year = $6, degree = $7, field_of_study = $8, \
                               current_company = $9, current_position = $10, city = $11, \
                               country = $12, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(fields.graduation_year)
        .bind(&fields.degree)
        .bind(&fields.field_of_study)
        .bind(&fields.current_company)
        .bind(&fields.current_position)
        .bind(&fields.city)
        .bind(&fields.country)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_email_conflict(e, "Failed to update alumni"))?
        .ok_or_else(|| AppError::not_found(format!("Alumni {id} not found")))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM alumni WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete alumni", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_year(&self) -> AppResult<Vec<AlumniYearCount>> {
        sqlx::query_as::<_, AlumniYearCount>(
            "SELECT EXTRACT(YEAR FROM created_at)::INT AS year, COUNT(*) AS total_alumni \
             FROM alumni \
             GROUP BY 1 \
             ORDER BY year DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count alumni", e))
    }
}
