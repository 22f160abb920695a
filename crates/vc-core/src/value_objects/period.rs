//! Reporting period - the (year, month) bucket summaries are keyed by

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month in UTC
///
/// Ordering is chronological: year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// Create a period, returning `None` unless `month` is in `1..=12`
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Period containing the given unix timestamp (seconds)
    pub fn from_timestamp(secs: i64) -> Self {
        let at = DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default();
        Self::from_datetime(at)
    }

    /// Period containing the given instant
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// Whether this period lies strictly after `other`
    #[inline]
    pub fn is_after(&self, other: &Period) -> bool {
        self > other
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
