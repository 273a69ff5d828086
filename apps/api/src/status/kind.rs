use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::status::HistoryError;

/// Pipeline position of a job application.
///
/// Declaration order matches rank, so the derived `Ord` agrees with [`rank`](Self::rank).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Saved,
    Sent,
    Contacted,
    Interview,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Saved,
        ApplicationStatus::Sent,
        ApplicationStatus::Contacted,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    /// Canonical token written to `status` and `status_changes`.
    pub fn as_token(self) -> &'static str {
        match self {
            ApplicationStatus::Saved => "saved",
            ApplicationStatus::Sent => "sent",
            ApplicationStatus::Contacted => "contacted",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Exact match against the canonical tokens. Used for requested targets.
    pub fn from_canonical(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_token() == token)
    }

    /// Decodes a persisted token. Accepts the legacy `send` / `contact`
    /// spellings still present in older rows.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "saved" => Some(ApplicationStatus::Saved),
            "sent" | "send" => Some(ApplicationStatus::Sent),
            "contacted" | "contact" => Some(ApplicationStatus::Contacted),
            "interview" => Some(ApplicationStatus::Interview),
            "offer" => Some(ApplicationStatus::Offer),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }

    /// Position in the pipeline: saved 0 through offer 4, rejected 5.
    pub fn rank(self) -> u8 {
        match self {
            ApplicationStatus::Saved => 0,
            ApplicationStatus::Sent => 1,
            ApplicationStatus::Contacted => 2,
            ApplicationStatus::Interview => 3,
            ApplicationStatus::Offer => 4,
            // Terminal branch rather than a step after `offer`. It still takes
            // the highest position so that rewinding to any of saved..offer
            // drops it, and rewinding to it keeps everything.
            ApplicationStatus::Rejected => 5,
        }
    }

    /// Whether an entry with this status survives a rewind to `target`.
    pub fn retained_by_rewind_to(self, target: ApplicationStatus) -> bool {
        self.rank() <= target.rank()
    }

    /// Sent or any later stage, rejection included.
    pub fn is_submitted(self) -> bool {
        self.rank() >= ApplicationStatus::Sent.rank()
    }

    /// The employer reacted: contacted or any later stage, rejection included.
    pub fn is_response(self) -> bool {
        self.rank() >= ApplicationStatus::Contacted.rank()
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for ApplicationStatus {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_canonical(s).ok_or_else(|| HistoryError::UnknownStatus(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_follow_pipeline_order() {
        let ranks: Vec<u8> = ApplicationStatus::ALL.iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_derived_order_matches_rank() {
        for pair in ApplicationStatus::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn test_tokens_round_trip() {
        for status in ApplicationStatus::ALL {
            assert_eq!(ApplicationStatus::from_token(status.as_token()), Some(status));
        }
    }

    #[test]
    fn test_legacy_tokens_decode() {
        assert_eq!(
            ApplicationStatus::from_token("send"),
            Some(ApplicationStatus::Sent)
        );
        assert_eq!(
            ApplicationStatus::from_token("contact"),
            Some(ApplicationStatus::Contacted)
        );
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        assert!(ApplicationStatus::from_token("hired").is_none());
        assert!(ApplicationStatus::from_token("Saved").is_none());
        assert!(matches!(
            "archived".parse::<ApplicationStatus>(),
            Err(HistoryError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_parse_accepts_only_canonical_tokens() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.as_token().parse::<ApplicationStatus>(), Ok(status));
        }
        assert!("send".parse::<ApplicationStatus>().is_err());
        assert!("contact".parse::<ApplicationStatus>().is_err());
        assert!(" offer ".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_rejected_dropped_by_rewind_to_offer() {
        assert!(!ApplicationStatus::Rejected.retained_by_rewind_to(ApplicationStatus::Offer));
        assert!(ApplicationStatus::Offer.retained_by_rewind_to(ApplicationStatus::Rejected));
    }

    #[test]
    fn test_submitted_and_response_classes() {
        assert!(!ApplicationStatus::Saved.is_submitted());
        assert!(ApplicationStatus::Sent.is_submitted());
        assert!(!ApplicationStatus::Sent.is_response());
        assert!(ApplicationStatus::Rejected.is_response());
    }

    #[test]
    fn test_serde_uses_lowercase_tokens() {
        let json = serde_json::to_string(&ApplicationStatus::Interview).unwrap();
        assert_eq!(json, r#""interview""#);
        let status: ApplicationStatus = serde_json::from_str(r#""contacted""#).unwrap();
        assert_eq!(status, ApplicationStatus::Contacted);
    }
}
