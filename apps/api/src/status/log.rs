use chrono::NaiveDateTime;
use serde::Serialize;

use crate::status::entry::{LogEntry, StatusChange, TIMESTAMP_FORMAT};
use crate::status::ApplicationStatus;

/// Placeholder date shown for entries whose timestamp could not be read.
pub const INVALID_DATE: &str = "invalid";

/// Ordered status history of one application, in stored order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLog {
    entries: Vec<LogEntry>,
}

/// Display record produced by [`StatusLog::history`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryItem {
    pub status: ApplicationStatus,
    pub date: String,
    pub malformed: bool,
    #[serde(skip)]
    pub changed_at: Option<NaiveDateTime>,
}

impl StatusLog {
    /// History of a freshly bookmarked application.
    pub fn bookmarked(now: NaiveDateTime) -> Self {
        Self {
            entries: vec![LogEntry::record(StatusChange::new(
                ApplicationStatus::Saved,
                now,
            ))],
        }
    }

    /// Decodes the `status_changes` column. A missing column is an empty log.
    pub fn from_column<I, S>(column: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: column.into_iter().map(LogEntry::decode).collect(),
        }
    }

    pub fn into_column(self) -> Vec<String> {
        self.entries.into_iter().map(LogEntry::into_raw).collect()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries whose status or timestamp could not be decoded.
    pub fn malformed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_malformed()).count()
    }

    /// Index of the first entry recorded for `status`.
    pub fn position(&self, status: ApplicationStatus) -> Option<usize> {
        self.entries.iter().position(|e| e.status() == Some(status))
    }

    pub fn contains(&self, status: ApplicationStatus) -> bool {
        self.position(status).is_some()
    }

    pub fn first(&self, status: ApplicationStatus) -> Option<&LogEntry> {
        self.position(status).map(|i| &self.entries[i])
    }

    pub(crate) fn push(&mut self, change: StatusChange) {
        self.entries.push(LogEntry::record(change));
    }

    pub(crate) fn replace(&mut self, index: usize, change: StatusChange) {
        self.entries[index] = LogEntry::record(change);
    }

    pub(crate) fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&LogEntry) -> bool,
    {
        self.entries.retain(keep);
    }

    pub(crate) fn truncate_to(&mut self, entry: Option<LogEntry>) {
        self.entries = entry.into_iter().collect();
    }

    /// Timestamp of the bookmark anchor, if it is readable.
    pub fn saved_at(&self) -> Option<NaiveDateTime> {
        self.first(ApplicationStatus::Saved)
            .and_then(LogEntry::changed_at)
    }

    /// Whole days elapsed since the application was bookmarked.
    pub fn days_since_saved(&self, now: NaiveDateTime) -> Option<i64> {
        self.saved_at().map(|saved| (now - saved).num_days().max(0))
    }

    /// Projection of the most recently recorded status: the dated entry with
    /// the latest timestamp, later position winning ties.
    ///
    /// The persisted `status` column can differ (advancing to `saved` does not
    /// restamp the anchor), so callers treat this as derived data only.
    pub fn latest_status(&self) -> Option<ApplicationStatus> {
        self.entries
            .iter()
            .filter_map(|e| Some((e.changed_at()?, e.status()?)))
            .enumerate()
            .max_by_key(|(i, (at, _))| (*at, *i))
            .map(|(_, (_, status))| status)
    }

    /// Display history sorted oldest first. Every stored entry yields one item;
    /// undated entries sort before dated ones and keep their relative order.
    pub fn history(&self) -> Vec<HistoryItem> {
        let mut items: Vec<HistoryItem> = self
            .entries
            .iter()
            .map(|entry| HistoryItem {
                status: entry.status().unwrap_or(ApplicationStatus::Saved),
                date: entry
                    .changed_at()
                    .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
                    .unwrap_or_else(|| INVALID_DATE.to_string()),
                malformed: entry.is_malformed(),
                changed_at: entry.changed_at(),
            })
            .collect();
        // Option orders None first; sort_by_key is stable.
        items.sort_by_key(|item| item.changed_at);
        items
    }
}

/// Parses a raw `status_changes` column straight into display history.
pub fn parse_history<S: AsRef<str>>(entries: &[S]) -> Vec<HistoryItem> {
    StatusLog::from_column(entries.iter().map(|s| s.as_ref().to_string())).history()
}
