use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::status::engine::Direction;
use crate::status::log::parse_history;
use crate::status::service::{parse_target, update_application_status, utc_now};
use crate::status::{ApplicationStatus, HistoryItem, StatusLog};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    /// Explicit backward correction; discards entries ranked above `status`.
    #[serde(default, alias = "isRewind")]
    pub rewind: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub status: ApplicationStatus,
    pub updated_history: Vec<HistoryItem>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub id: Uuid,
    pub status: String,
    pub history: Vec<HistoryItem>,
    /// Most recently dated entry; may differ from the stored `status`.
    pub latest_status: Option<ApplicationStatus>,
    pub saved_at: Option<NaiveDateTime>,
    pub days_since_saved: Option<i64>,
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, AppError> {
    let target = parse_target(&req.status)?;
    let update = update_application_status(
        state.store.as_ref(),
        id,
        target,
        Direction::from_rewind_flag(req.rewind),
        utc_now(),
    )
    .await?;

    Ok(Json(UpdateStatusResponse {
        success: true,
        status: update.status,
        updated_history: update.history,
    }))
}

/// GET /api/v1/applications/:id/history
pub async fn handle_get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, AppError> {
    let row = state
        .store
        .fetch(id)
        .await
        .map_err(AppError::store_read)?
        .ok_or_else(|| AppError::NotFound(format!("Job offer {id} not found")))?;

    let history = parse_history(&row.status_changes);
    let log = StatusLog::from_column(row.status_changes);
    Ok(Json(HistoryResponse {
        id,
        status: row.status,
        history,
        latest_status: log.latest_status(),
        saved_at: log.saved_at(),
        days_since_saved: log.days_since_saved(utc_now()),
    }))
}
