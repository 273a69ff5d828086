use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::applications::store::{ApplicationStore, StoreError};
use crate::status::engine::{self, Direction};
use crate::status::{ApplicationStatus, HistoryItem, StatusLog};

#[derive(Debug, Error)]
pub enum StatusUpdateError {
    #[error("invalid target status '{0}'")]
    InvalidTargetStatus(String),

    #[error("job offer {0} not found")]
    NotFound(Uuid),

    #[error("failed to read status history: {0}")]
    DataStoreRead(#[source] StoreError),

    #[error("failed to persist status update: {0}")]
    DataStoreWrite(#[source] StoreError),
}

/// Result of a persisted status update.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
    pub history: Vec<HistoryItem>,
}

/// Current UTC wall clock, as written into history entries.
pub fn utc_now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Validates a requested status token before anything is read or written.
/// Only the six canonical tokens are accepted; legacy spellings are read from
/// stored rows but never accepted as a target.
pub fn parse_target(raw: &str) -> Result<ApplicationStatus, StatusUpdateError> {
    raw.parse()
        .map_err(|_| StatusUpdateError::InvalidTargetStatus(raw.to_string()))
}

/// Read-modify-write of one application's status.
///
/// The write replaces both columns at once, so concurrent updates resolve as
/// last-write-wins and each stored list is a complete engine output. A failed
/// write leaves the previous row untouched; callers may retry the whole cycle.
pub async fn update_application_status(
    store: &dyn ApplicationStore,
    id: Uuid,
    target: ApplicationStatus,
    direction: Direction,
    now: NaiveDateTime,
) -> Result<StatusUpdate, StatusUpdateError> {
    let column = store
        .fetch_status_changes(id)
        .await
        .map_err(StatusUpdateError::DataStoreRead)?
        .ok_or(StatusUpdateError::NotFound(id))?;

    let log = StatusLog::from_column(column);
    let malformed = log.malformed_count();
    if malformed > 0 {
        warn!("Job offer {id} has {malformed} unreadable status history entries");
    }

    let transition = engine::apply(log, target, direction, now);
    let history = transition.log.history();
    let entry_count = transition.log.len();
    let column = transition.log.into_column();

    match store.write_status(id, transition.status, &column).await {
        Ok(()) => {}
        Err(StoreError::Missing(_)) => return Err(StatusUpdateError::NotFound(id)),
        Err(e) => {
            error!("Status update for {id} not persisted: {e}");
            return Err(StatusUpdateError::DataStoreWrite(e));
        }
    }

    info!(
        "Job offer {id} moved to {} ({:?}), {} history entries",
        transition.status,
        direction,
        entry_count
    );

    Ok(StatusUpdate {
        status: transition.status,
        history,
    })
}
