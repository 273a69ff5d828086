//! Status history engine: pure transformations of a [`StatusLog`].
//!
//! `advance` handles forward and lateral moves. It appends or restamps one
//! entry and never drops anything. `rewind` handles explicit backward
//! corrections and is the only path that discards recorded entries.

use chrono::NaiveDateTime;

use crate::status::entry::StatusChange;
use crate::status::{ApplicationStatus, StatusLog};

/// Which history policy a status update applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Advance,
    Rewind,
}

impl Direction {
    pub fn from_rewind_flag(rewind: bool) -> Self {
        if rewind {
            Direction::Rewind
        } else {
            Direction::Advance
        }
    }
}

/// New state of an application after a status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub status: ApplicationStatus,
    pub log: StatusLog,
}

pub fn apply(
    log: StatusLog,
    target: ApplicationStatus,
    direction: Direction,
    now: NaiveDateTime,
) -> Transition {
    match direction {
        Direction::Advance => advance(log, target, now),
        Direction::Rewind => rewind(log, target, now),
    }
}

/// Records `target` without discarding anything.
///
/// An existing entry for `target` is restamped in place, except `saved`,
/// whose first timestamp is the bookmark anchor and is never overwritten.
pub fn advance(mut log: StatusLog, target: ApplicationStatus, now: NaiveDateTime) -> Transition {
    let change = StatusChange::new(target, now);
    match log.position(target) {
        Some(_) if target == ApplicationStatus::Saved => {}
        Some(index) => log.replace(index, change),
        None => log.push(change),
    }
    Transition { status: target, log }
}

/// Moves back to `target`, dropping every entry ranked above it.
///
/// Rewinding to `saved` is a full reset: only the first `saved` entry
/// survives. Entries whose status cannot be read are dropped, since their
/// rank is unknown. If no entry for `target` survives, one stamped `now` is
/// appended; an entry that survives keeps its timestamp.
pub fn rewind(mut log: StatusLog, target: ApplicationStatus, now: NaiveDateTime) -> Transition {
    if target == ApplicationStatus::Saved {
        let anchor = log.first(ApplicationStatus::Saved).cloned();
        log.truncate_to(anchor);
    } else {
        log.retain(|entry| {
            entry
                .status()
                .is_some_and(|status| status.retained_by_rewind_to(target))
        });
    }

    if !log.contains(target) {
        log.push(StatusChange::new(target, now));
    }
    Transition { status: target, log }
}
