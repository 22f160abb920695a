//! Formatted duration - elapsed seconds rendered as hours/minutes/seconds

use serde::Serialize;
use std::fmt;

/// Hours/minutes/seconds triple for display
///
/// Hours are not wrapped into days; a month of presence reads as `0720h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FormattedDuration {
    pub hours: u64,
    pub minutes: u8,
    pub seconds: u8,
    /// Raw total the triple was derived from
    pub total_seconds: u64,
}

impl FormattedDuration {
    /// Split a count of seconds. Negative input is treated as zero.
    pub fn from_seconds(seconds: i64) -> Self {
        let total = u64::try_from(seconds).unwrap_or(0);
        Self {
            hours: total / 3600,
            minutes: ((total % 3600) / 60) as u8,
            seconds: (total % 60) as u8,
            total_seconds: total,
        }
    }
}

impl fmt::Display for FormattedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:03}h {:02}m {:02}s",
            self.hours, self.minutes, self.seconds
        )
    }
}
