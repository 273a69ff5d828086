//! Pipeline metrics over a user's saved offers.
//!
//! Counts come from the `status` column; response times come from the
//! `status_changes` log.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::models::application::JobOfferRow;
use crate::status::ApplicationStatus;
use crate::status::StatusLog;

/// Response times outside this window (in days) are treated as noise.
const RESPONSE_WINDOW_DAYS: std::ops::RangeInclusive<i64> = 1..=180;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: ApplicationStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineMetrics {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
    pub sent_percentage: u32,
    pub response_percentage: u32,
    /// Share of sent applications that got any response.
    pub response_rate: u32,
    pub average_response_days: Option<f64>,
    pub average_saved_per_month: u32,
}

pub fn compute_metrics(rows: &[JobOfferRow]) -> PipelineMetrics {
    let total = rows.len();

    let statuses: Vec<ApplicationStatus> = rows
        .iter()
        .map(|r| ApplicationStatus::from_token(&r.status).unwrap_or(ApplicationStatus::Saved))
        .collect();

    let by_status = ApplicationStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: statuses.iter().filter(|&&s| s == status).count(),
        })
        .collect();

    let sent = statuses.iter().filter(|s| s.is_submitted()).count();
    let responded = statuses.iter().filter(|s| s.is_response()).count();

    let response_days: Vec<i64> = rows
        .iter()
        .filter_map(|r| response_days(&StatusLog::from_column(r.status_changes.iter().cloned())))
        .filter(|days| RESPONSE_WINDOW_DAYS.contains(days))
        .collect();

    let created: Vec<DateTime<Utc>> = rows.iter().map(|r| r.created_at).collect();

    let average_response_days = if response_days.is_empty() {
        None
    } else {
        let mean = response_days.iter().sum::<i64>() as f64 / response_days.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    PipelineMetrics {
        total,
        by_status,
        sent_percentage: percentage(sent, total),
        response_percentage: percentage(responded, total),
        response_rate: percentage(responded, sent),
        average_response_days,
        average_saved_per_month: average_per_month(&created),
    }
}

fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 * 100.0 / whole as f64).round() as u32
}

/// Days from the first `sent` entry to the next response entry after it in
/// stored order, rounded up to whole days.
pub fn response_days(log: &StatusLog) -> Option<i64> {
    let entries = log.entries();
    if entries.len() < 2 {
        return None;
    }
    let sent_index = log.position(ApplicationStatus::Sent)?;
    let sent_at = entries[sent_index].changed_at()?;

    let response = entries[sent_index + 1..]
        .iter()
        .find(|e| e.status().is_some_and(ApplicationStatus::is_response))?;
    let responded_at = response.changed_at()?;

    let seconds = (responded_at - sent_at).num_seconds().abs();
    Some((seconds + 86_399) / 86_400)
}

fn average_per_month(created: &[DateTime<Utc>]) -> u32 {
    let (Some(first), Some(last)) = (created.iter().min(), created.iter().max()) else {
        return 0;
    };
    let months = (last.year() - first.year()) * 12 + last.month() as i32 - first.month() as i32 + 1;
    (created.len() as f64 / months.max(1) as f64).round() as u32
}
