use chrono::{DateTime, TimeDelta, Utc};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::fmt;

/// Severity of a certificate's remaining validity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(level)
    }
}

impl Level {
    /// Colour a days-remaining figure for the console
    #[must_use]
    pub fn paint(self, days_left: i64) -> ColoredString {
        let days = days_left.to_string();
        match self {
            Self::Info => days.green(),
            Self::Warning => days.yellow().bold(),
            Self::Error => days.red().bold(),
        }
    }
}

/// Day cutoffs used to classify a certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Fewer days than this is an error
    pub error_days: i64,
    /// Fewer days than this (but not an error) is a warning
    pub warn_days: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            error_days: 7,
            warn_days: 28,
        }
    }
}

impl Thresholds {
    #[must_use]
    pub const fn classify(&self, days_left: i64) -> Level {
        classify(days_left, self.error_days, self.warn_days)
    }
}

/// Map the remaining days onto a severity level
///
/// `error_threshold` is expected to be below `warn_threshold`; with inverted
/// thresholds the error cutoff wins and no warning is ever produced.
#[must_use]
pub const fn classify(days_left: i64, error_threshold: i64, warn_threshold: i64) -> Level {
    if days_left < error_threshold {
        Level::Error
    } else if days_left < warn_threshold {
        Level::Warning
    } else {
        Level::Info
    }
}

/// Whole days from `now` until `not_after`, rounded towards negative infinity
///
/// Any fraction of a day already past counts as a whole day, down to the
/// nanosecond: a certificate that expired 500ms ago has `-1` days left.
#[must_use]
pub fn days_left(not_after: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let remaining = not_after - now;
    // num_days truncates towards zero
    let days = remaining.num_days();
    if remaining < TimeDelta::days(days) {
        days - 1
    } else {
        days
    }
}

/// Terminal verdict for one domain whose certificate was read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub domain: String,
    pub days_left: i64,
    pub level: Level,
    pub expires_at: DateTime<Utc>,
}

impl Classification {
    #[must_use]
    pub fn new(
        domain: impl Into<String>,
        not_after: DateTime<Utc>,
        now: DateTime<Utc>,
        thresholds: &Thresholds,
    ) -> Self {
        let days_left = days_left(not_after, now);
        Self {
            domain: domain.into(),
            days_left,
            level: thresholds.classify(days_left),
            expires_at: not_after,
        }
    }
}
