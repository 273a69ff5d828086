use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::applications::store::StoreError;
use crate::status::service::StatusUpdateError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Data store read error: {0}")]
    DataStoreRead(String),

    #[error("Data store write error: {0}")]
    DataStoreWrite(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Failed load of stored rows. Surfaces as a retryable 503.
    pub fn store_read(err: StoreError) -> Self {
        AppError::DataStoreRead(err.to_string())
    }

    /// Failed persist of a row. Nothing was written; surfaces as a retryable 503.
    pub fn store_write(err: StoreError) -> Self {
        AppError::DataStoreWrite(err.to_string())
    }
}

impl From<StatusUpdateError> for AppError {
    fn from(err: StatusUpdateError) -> Self {
        match err {
            StatusUpdateError::InvalidTargetStatus(raw) => {
                AppError::Validation(format!("unknown status '{raw}'"))
            }
            StatusUpdateError::NotFound(id) => {
                AppError::NotFound(format!("Job offer {id} not found"))
            }
            StatusUpdateError::DataStoreRead(e) => AppError::store_read(e),
            StatusUpdateError::DataStoreWrite(e) => AppError::store_write(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::DataStoreRead(msg) => {
                tracing::error!("Data store read error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "DATA_STORE_READ_ERROR",
                    "Could not load applications; retry the request".to_string(),
                )
            }
            AppError::DataStoreWrite(msg) => {
                tracing::error!("Data store write error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "DATA_STORE_WRITE_ERROR",
                    "The change was not saved; retry the request".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_invalid_target_maps_to_bad_request() {
        let err: AppError = StatusUpdateError::InvalidTargetStatus("hired".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: AppError = StatusUpdateError::NotFound(Uuid::nil()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_write_failure_is_retryable_status() {
        let err: AppError =
            StatusUpdateError::DataStoreWrite(StoreError::Unavailable("down".to_string())).into();
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_plain_store_reads_share_status_update_mapping() {
        let direct = AppError::store_read(StoreError::Missing(Uuid::nil()));
        let via_update: AppError = StatusUpdateError::DataStoreRead(StoreError::Unavailable(
            "pool timed out".to_string(),
        ))
        .into();
        assert!(matches!(direct, AppError::DataStoreRead(_)));
        assert!(matches!(via_update, AppError::DataStoreRead(_)));
        assert_eq!(direct.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(via_update.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
