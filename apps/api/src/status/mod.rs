// Application status history: ordered pipeline statuses, the persisted
// `status_changes` log, and the advance/rewind engine that rewrites it.
// Everything below `service` is pure and synchronous.

pub mod engine;
pub mod entry;
pub mod handlers;
pub mod kind;
pub mod log;
pub mod service;

use thiserror::Error;

pub use kind::ApplicationStatus;
pub use log::{HistoryItem, StatusLog};

/// Why a single persisted history entry could not be decoded.
///
/// Never fatal: the affected entry degrades to a flagged placeholder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("unknown status token '{0}'")]
    UnknownStatus(String),

    #[error("history entry '{0}' has no '-' separator")]
    MissingSeparator(String),

    #[error("history entry '{0}' has an unreadable timestamp")]
    InvalidTimestamp(String),
}
