//! Retention policies for per-user logs.
//!
//! The mobile app never trimmed its logs. [`RetentionPolicy::Unbounded`]
//! keeps that behaviour and is the default; the other policies are opt-in
//! through configuration.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::event_log::LogRecord;

/// How many entries a log keeps after each append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Keep every entry forever.
    #[default]
    Unbounded,
    /// Keep only the newest `count` entries.
    KeepLast {
        /// Maximum number of entries retained (at least 1).
        count: usize,
    },
    /// Drop entries older than `days` relative to the newest entry.
    MaxAge {
        /// Age window in days (at least 1).
        days: u32,
    },
}

impl RetentionPolicy {
    /// Reject policies that would discard the entry just appended.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for `KeepLast { count: 0 }` or
    /// `MaxAge { days: 0 }`.
    pub fn validate(self) -> Result<Self, StoreError> {
        match self {
            Self::KeepLast { count: 0 } => Err(StoreError::Config(
                "retention keep_last.count must be at least 1".to_owned(),
            )),
            Self::MaxAge { days: 0 } => Err(StoreError::Config(
                "retention max_age.days must be at least 1".to_owned(),
            )),
            other => Ok(other),
        }
    }

    /// Trim a newest-first log in place.
    ///
    /// The age window is measured from the newest entry's timestamp, so the
    /// entry that was just prepended always survives.
    pub fn apply<R: LogRecord>(self, log: &mut Vec<R>) {
        match self {
            Self::Unbounded => {}
            Self::KeepLast { count } => log.truncate(count.max(1)),
            Self::MaxAge { days } => {
                let Some(newest) = log.first().map(LogRecord::recorded_at) else {
                    return;
                };
                let cutoff = TimeDelta::try_days(i64::from(days))
                    .and_then(|window| newest.checked_sub_signed(window));
                if let Some(cutoff) = cutoff {
                    log.retain(|entry| entry.recorded_at() >= cutoff);
                }
            }
        }
    }
}
