//! Monthly summary - accumulated voice time per membership, channel, and month

use serde::Serialize;

use crate::value_objects::{MembershipId, Period, Snowflake};

/// Primary key of a `vc_summary` row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SummaryKey {
    pub membership_id: MembershipId,
    pub channel_id: Snowflake,
    pub period: Period,
}

impl SummaryKey {
    pub fn new(membership_id: MembershipId, channel_id: Snowflake, period: Period) -> Self {
        Self {
            membership_id,
            channel_id,
            period,
        }
    }
}

/// Connection and mic-on totals in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SummaryTotals {
    pub total_connection_time: i64,
    pub total_mic_on_time: i64,
}

impl SummaryTotals {
    pub fn new(total_connection_time: i64, total_mic_on_time: i64) -> Self {
        Self {
            total_connection_time,
            total_mic_on_time,
        }
    }

    /// Connected time spent muted; the primary ranking key
    #[inline]
    pub fn quiet_time(&self) -> i64 {
        self.total_connection_time - self.total_mic_on_time
    }
}

/// Filter shared by ranking queries
///
/// `month: None` widens the scope to the whole year; `channel_id: None`
/// aggregates every channel in the guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingScope {
    pub guild_id: Snowflake,
    pub channel_id: Option<Snowflake>,
    pub year: i32,
    pub month: Option<u32>,
}

/// One user's aggregated totals within a ranking scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingRow {
    pub user_id: Snowflake,
    pub totals: SummaryTotals,
}

impl RankingRow {
    /// Ranking order: quiet time desc, connection desc, user id asc.
    /// Returns `Less` when `self` ranks ahead of `other`.
    pub fn ranking_cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .totals
            .quiet_time()
            .cmp(&self.totals.quiet_time())
            .then_with(|| {
                other
                    .totals
                    .total_connection_time
                    .cmp(&self.totals.total_connection_time)
            })
            .then_with(|| self.user_id.cmp(&other.user_id))
    }
}

/// A user's 1-based position within a ranking scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRank {
    pub rank: i64,
    pub totals: SummaryTotals,
}
