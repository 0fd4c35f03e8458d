//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{InsertOutcome, NewMapping, UrlMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;

/// Name of the unique constraint on `urls.code`.
const CODE_CONSTRAINT: &str = "urls_code_key";

#[derive(sqlx::FromRow)]
struct MappingRow {
    code: String,
    url: String,
    created_at: DateTime<Utc>,
    author: String,
    hits: i64,
}

impl From<MappingRow> for UrlMapping {
    fn from(row: MappingRow) -> Self {
        // The CHECK constraint keeps hits non-negative.
        let hits = u64::try_from(row.hits).unwrap_or_default();
        UrlMapping::new(row.code, row.url, row.created_at, row.author, hits)
    }
}

/// PostgreSQL repository for URL mappings.
///
/// Relies on the `urls_code_key` and `urls_url_key` unique constraints
/// created by the migrations.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    db_err.is_unique_violation() && db_err.constraint() == Some(CODE_CONSTRAINT)
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn find_by_url(&self, url: &str) -> Result<Option<String>, AppError> {
        let code = sqlx::query_scalar::<_, String>("SELECT code FROM urls WHERE url = $1")
            .bind(url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(code)
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM urls WHERE code = $1)",
        )
        .bind(code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn insert(&self, new_mapping: NewMapping) -> Result<InsertOutcome, AppError> {
        let inserted = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO urls (code, url, created_at, author, hits)
            VALUES ($1, $2, $3, $4, 0)
            ON CONFLICT ON CONSTRAINT urls_url_key DO NOTHING
            RETURNING code
            "#,
        )
        .bind(&new_mapping.code)
        .bind(&new_mapping.url)
        .bind(new_mapping.created_at)
        .bind(&new_mapping.author)
        .fetch_optional(self.pool.as_ref())
        .await;

        match inserted {
            Ok(Some(code)) => Ok(InsertOutcome::Created(code)),
            Ok(None) => {
                // The URL won the race in another transaction; report its code.
                let existing = self.find_by_url(&new_mapping.url).await?.ok_or_else(|| {
                    AppError::storage(
                        "Conflicting mapping disappeared",
                        json!({ "url": new_mapping.url }),
                    )
                })?;
                Ok(InsertOutcome::Existing(existing))
            }
            Err(e) if is_unique_violation_on_code(&e) => Ok(InsertOutcome::CodeTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT code, url, created_at, author, hits
            FROM urls
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlMapping::from))
    }

    async fn increment_hits(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE urls SET hits = hits + 1 WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
