use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::applications::metrics::{compute_metrics, PipelineMetrics};
use crate::errors::AppError;
use crate::models::application::{JobOfferRow, NewJobOffer};
use crate::state::AppState;
use crate::status::{ApplicationStatus, StatusLog};

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// Builds the row for a newly bookmarked offer: status `saved` and a history
/// holding the single anchor entry.
pub fn bookmark_row(new: NewJobOffer, now: DateTime<Utc>) -> Result<JobOfferRow, AppError> {
    if new.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if new.company.trim().is_empty() {
        return Err(AppError::Validation("company cannot be empty".to_string()));
    }

    Ok(JobOfferRow {
        id: Uuid::new_v4(),
        user_id: new.user_id,
        title: new.title.trim().to_string(),
        company: new.company.trim().to_string(),
        site: new.site,
        url: new.url,
        salary: new.salary,
        note: new.note,
        priority: new.priority,
        status: ApplicationStatus::Saved.as_token().to_string(),
        status_changes: StatusLog::bookmarked(now.naive_utc()).into_column(),
        created_at: now,
    })
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(req): Json<NewJobOffer>,
) -> Result<(StatusCode, Json<JobOfferRow>), AppError> {
    let row = bookmark_row(req, Utc::now())?;
    state.store.insert(&row).await.map_err(AppError::store_write)?;
    info!("Bookmarked job offer {} for user {}", row.id, row.user_id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<JobOfferRow>>, AppError> {
    let rows = state
        .store
        .list_for_user(params.user_id)
        .await
        .map_err(AppError::store_read)?;
    Ok(Json(rows))
}

/// GET /api/v1/applications/metrics
pub async fn handle_metrics(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<PipelineMetrics>, AppError> {
    let rows = state
        .store
        .list_for_user(params.user_id)
        .await
        .map_err(AppError::store_read)?;
    Ok(Json(compute_metrics(&rows)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_request(title: &str, company: &str) -> NewJobOffer {
        NewJobOffer {
            user_id: Uuid::new_v4(),
            title: title.to_string(),
            company: company.to_string(),
            site: None,
            url: Some("https://jobs.example.com/1".to_string()),
            salary: None,
            note: None,
            priority: 2,
        }
    }

    #[test]
    fn test_bookmark_row_starts_with_saved_anchor() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();
        let row = bookmark_row(make_request("  Platform Engineer ", "Acme"), now).unwrap();
        assert_eq!(row.title, "Platform Engineer");
        assert_eq!(row.status, "saved");
        assert_eq!(row.status_changes, vec!["saved-2024-06-01 08:30:00"]);
        assert_eq!(row.created_at, now);
    }

    #[test]
    fn test_bookmark_row_requires_title_and_company() {
        let now = Utc::now();
        assert!(matches!(
            bookmark_row(make_request("", "Acme"), now),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            bookmark_row(make_request("Engineer", "   "), now),
            Err(AppError::Validation(_))
        ));
    }
}
