//! Persistence seam for saved job offers.
//!
//! `AppState` carries an `Arc<dyn ApplicationStore>`; production uses
//! [`PgApplicationStore`], tests use the in-memory store below.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::application::JobOfferRow;
use crate::status::ApplicationStatus;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("job offer {0} does not exist")]
    Missing(Uuid),

    #[error("data store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    /// Pool exhaustion and shutdown are transient; everything else is a query failure.
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn insert(&self, row: &JobOfferRow) -> Result<(), StoreError>;

    async fn fetch(&self, id: Uuid) -> Result<Option<JobOfferRow>, StoreError>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<JobOfferRow>, StoreError>;

    /// Reads only the `status_changes` column. `None` when the row is absent;
    /// a NULL column reads as an empty list.
    async fn fetch_status_changes(&self, id: Uuid) -> Result<Option<Vec<String>>, StoreError>;

    /// Replaces `status` and `status_changes` together in a single write.
    async fn write_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        status_changes: &[String],
    ) -> Result<(), StoreError>;
}

pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn insert(&self, row: &JobOfferRow) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO job_offers
                (id, user_id, title, company, site, url, salary, note,
                 priority, status, status_changes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(&row.title)
        .bind(&row.company)
        .bind(&row.site)
        .bind(&row.url)
        .bind(&row.salary)
        .bind(&row.note)
        .bind(row.priority)
        .bind(&row.status)
        .bind(&row.status_changes)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<JobOfferRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobOfferRow>(
            r#"
            SELECT id, user_id, title, company, site, url, salary, note, priority,
                   status, COALESCE(status_changes, '{}') AS status_changes, created_at
            FROM job_offers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<JobOfferRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobOfferRow>(
            r#"
            SELECT id, user_id, title, company, site, url, salary, note, priority,
                   status, COALESCE(status_changes, '{}') AS status_changes, created_at
            FROM job_offers
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn fetch_status_changes(&self, id: Uuid) -> Result<Option<Vec<String>>, StoreError> {
        let column: Option<Option<Vec<String>>> =
            sqlx::query_scalar("SELECT status_changes FROM job_offers WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(column.map(Option::unwrap_or_default))
    }

    async fn write_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        status_changes: &[String],
    ) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE job_offers SET status = $1, status_changes = $2 WHERE id = $3")
                .bind(status.as_token())
                .bind(status_changes)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(id));
        }
        debug!("Wrote status {status} with {} history entries for {id}", status_changes.len());
        Ok(())
    }
}
