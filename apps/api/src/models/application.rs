use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A saved job offer, one row of `job_offers`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobOfferRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    pub site: Option<String>,
    pub url: Option<String>,
    pub salary: Option<String>,
    pub note: Option<String>,
    pub priority: i32,
    pub status: String,
    pub status_changes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when a user bookmarks an offer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewJobOffer {
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    pub site: Option<String>,
    pub url: Option<String>,
    pub salary: Option<String>,
    pub note: Option<String>,
    #[serde(default)]
    pub priority: i32,
}
