use chrono::{NaiveDateTime, Timelike};
use tracing::debug;

use crate::status::{ApplicationStatus, HistoryError};

/// Timestamp layout used inside persisted entries (UTC, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Layouts accepted when reading rows written by other clients.
const LENIENT_FORMATS: &[&str] = &[
    TIMESTAMP_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// One status transition: `<status>-<YYYY-MM-DD HH:MM:SS>` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub status: ApplicationStatus,
    pub changed_at: NaiveDateTime,
}

impl StatusChange {
    /// Builds a change, truncating `changed_at` to whole seconds.
    pub fn new(status: ApplicationStatus, changed_at: NaiveDateTime) -> Self {
        Self {
            status,
            changed_at: changed_at.with_nanosecond(0).unwrap_or(changed_at),
        }
    }

    pub fn encode(&self) -> String {
        format!(
            "{}-{}",
            self.status.as_token(),
            self.changed_at.format(TIMESTAMP_FORMAT)
        )
    }

    pub fn decode(raw: &str) -> Result<Self, HistoryError> {
        let (token, timestamp) = split_entry(raw)?;
        let status = ApplicationStatus::from_token(token)
            .ok_or_else(|| HistoryError::UnknownStatus(token.to_string()))?;
        let changed_at = parse_timestamp(timestamp)
            .ok_or_else(|| HistoryError::InvalidTimestamp(raw.to_string()))?;
        Ok(Self::new(status, changed_at))
    }
}

fn split_entry(raw: &str) -> Result<(&str, &str), HistoryError> {
    raw.split_once('-')
        .ok_or_else(|| HistoryError::MissingSeparator(raw.to_string()))
}

pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    LENIENT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// A persisted history entry together with whatever could be decoded from it.
///
/// The original string is kept so entries the engine does not touch are
/// written back byte-for-byte, legacy tokens and odd timestamps included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    raw: String,
    status: Option<ApplicationStatus>,
    changed_at: Option<NaiveDateTime>,
}

impl LogEntry {
    /// Decodes a stored string. Never fails: unreadable parts are left empty
    /// and the entry is reported as malformed.
    pub fn decode(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match StatusChange::decode(&raw) {
            Ok(change) => Self {
                raw,
                status: Some(change.status),
                changed_at: Some(change.changed_at),
            },
            Err(e) => {
                debug!("Degrading malformed status history entry: {e}");
                let status = split_entry(&raw)
                    .ok()
                    .and_then(|(token, _)| ApplicationStatus::from_token(token));
                Self {
                    raw,
                    status,
                    changed_at: None,
                }
            }
        }
    }

    pub fn record(change: StatusChange) -> Self {
        Self {
            raw: change.encode(),
            status: Some(change.status),
            changed_at: Some(change.changed_at),
        }
    }

    /// `None` when the status token is missing or unknown.
    pub fn status(&self) -> Option<ApplicationStatus> {
        self.status
    }

    /// `None` when the timestamp could not be read.
    pub fn changed_at(&self) -> Option<NaiveDateTime> {
        self.changed_at
    }

    pub fn is_malformed(&self) -> bool {
        self.status.is_none() || self.changed_at.is_none()
    }

    pub fn into_raw(self) -> String {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_encode_uses_space_separated_seconds() {
        let change = StatusChange::new(ApplicationStatus::Interview, at(2024, 1, 10, 14, 0, 0));
        assert_eq!(change.encode(), "interview-2024-01-10 14:00:00");
    }

    #[test]
    fn test_new_truncates_subseconds() {
        let precise = at(2024, 3, 1, 8, 30, 15)
            .with_nanosecond(987_000_000)
            .unwrap();
        let change = StatusChange::new(ApplicationStatus::Sent, precise);
        assert_eq!(change.encode(), "sent-2024-03-01 08:30:15");
    }

    #[test]
    fn test_decode_splits_on_first_dash_only() {
        let change = StatusChange::decode("saved-2024-01-01 10:00:00").unwrap();
        assert_eq!(change.status, ApplicationStatus::Saved);
        assert_eq!(change.changed_at, at(2024, 1, 1, 10, 0, 0));
    }

    #[test]
    fn test_decode_accepts_iso_t_separator() {
        let change = StatusChange::decode("offer-2024-05-02T09:15:00").unwrap();
        assert_eq!(change.changed_at, at(2024, 5, 2, 9, 15, 0));
    }

    #[test]
    fn test_decode_missing_separator() {
        assert!(matches!(
            StatusChange::decode("interview"),
            Err(HistoryError::MissingSeparator(_))
        ));
    }

    #[test]
    fn test_decode_bad_timestamp() {
        assert!(matches!(
            StatusChange::decode("sent-yesterday"),
            Err(HistoryError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_decode_unknown_status() {
        assert!(matches!(
            StatusChange::decode("ghosted-2024-01-01 10:00:00"),
            Err(HistoryError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_canonical_token_survives_decode_encode() {
        for status in ApplicationStatus::ALL {
            let raw = format!("{}-2024-02-29 23:59:59", status.as_token());
            let change = StatusChange::decode(&raw).unwrap();
            let encoded = change.encode();
            assert_eq!(encoded.split_once('-').unwrap().0, status.as_token());
            assert_eq!(encoded, raw);
        }
    }

    #[test]
    fn test_log_entry_keeps_raw_legacy_string() {
        let entry = LogEntry::decode("send-2024-01-05 09:00:00");
        assert_eq!(entry.status(), Some(ApplicationStatus::Sent));
        assert!(!entry.is_malformed());
        assert_eq!(entry.into_raw(), "send-2024-01-05 09:00:00");
    }

    #[test]
    fn test_log_entry_with_bad_date_keeps_status() {
        let entry = LogEntry::decode("contacted-not a date");
        assert_eq!(entry.status(), Some(ApplicationStatus::Contacted));
        assert!(entry.changed_at().is_none());
        assert!(entry.is_malformed());
    }

    #[test]
    fn test_log_entry_garbage() {
        let entry = LogEntry::decode("???");
        assert!(entry.status().is_none());
        assert!(entry.is_malformed());
        assert_eq!(entry.into_raw(), "???");
    }
}
