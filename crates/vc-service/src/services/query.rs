//! Ranking and summary query service
//!
//! Read-only. Every query first resolves its (year, month) arguments into a
//! scope and rejects periods that lie in the future.

use tracing::{debug, instrument};

use vc_core::entities::{RankingScope, SummaryKey, SummaryTotals};
use vc_core::traits::VoiceStore;
use vc_core::value_objects::{Period, Snowflake};
use vc_core::DomainError;

use crate::dto::{
    RankingEntryResponse, RankingResponse, SummaryResponse, UserRankResponse, VoiceTotalsResponse,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Period a query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    Monthly(Period),
    Yearly(i32),
}

impl QueryScope {
    pub fn year(&self) -> i32 {
        match self {
            Self::Monthly(period) => period.year,
            Self::Yearly(year) => *year,
        }
    }

    /// `None` for yearly scopes
    pub fn month(&self) -> Option<u32> {
        match self {
            Self::Monthly(period) => Some(period.month),
            Self::Yearly(_) => None,
        }
    }

    fn ranking_scope(&self, guild_id: Snowflake, channel_id: Option<Snowflake>) -> RankingScope {
        RankingScope {
            guild_id,
            channel_id,
            year: self.year(),
            month: self.month(),
        }
    }
}

/// Query service
pub struct QueryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> QueryService<'a> {
    /// Create a new QueryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve optional (year, month) arguments against the current period
    ///
    /// A year without a month selects the whole year. Anything else selects
    /// one month, with missing parts taken from the current period. For the
    /// future check a missing month counts as January.
    pub fn resolve_scope(&self, year: Option<i32>, month: Option<u32>) -> ServiceResult<QueryScope> {
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(DomainError::InvalidMonth(m).into());
            }
        }

        let current = Period::from_timestamp(self.ctx.now());
        let requested = Period {
            year: year.unwrap_or(current.year),
            month: month.unwrap_or(1),
        };
        if requested.is_after(&current) {
            return Err(DomainError::FutureDate {
                year: requested.year,
                month: requested.month,
            }
            .into());
        }

        Ok(match (year, month) {
            (Some(year), None) => QueryScope::Yearly(year),
            (year, month) => QueryScope::Monthly(Period {
                year: year.unwrap_or(current.year),
                month: month.unwrap_or(current.month),
            }),
        })
    }

    /// A member's totals in one channel
    ///
    /// A month with no recorded time is `NoData`; a year with no recorded
    /// time is all zeros.
    #[instrument(skip(self))]
    pub async fn get_summary(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        channel_id: Snowflake,
        year: Option<i32>,
        month: Option<u32>,
    ) -> ServiceResult<SummaryResponse> {
        let scope = self.resolve_scope(year, month)?;
        let membership = self.ctx.store().find_membership(guild_id, user_id).await?;

        let totals = match (scope, membership) {
            (QueryScope::Monthly(period), Some(member)) => {
                self.ctx
                    .store()
                    .read_summary(&SummaryKey::new(member.id, channel_id, period))
                    .await?
            }
            (QueryScope::Monthly(_), None) => return Err(DomainError::NoData.into()),
            (QueryScope::Yearly(year), Some(member)) => {
                self.ctx
                    .store()
                    .read_yearly_summary(member.id, channel_id, year)
                    .await?
            }
            (QueryScope::Yearly(_), None) => SummaryTotals::default(),
        };

        debug!(%guild_id, %user_id, %channel_id, ?scope, "Summary read");
        Ok(SummaryResponse {
            guild_id: guild_id.to_string(),
            user_id: user_id.to_string(),
            channel_id: channel_id.to_string(),
            year: scope.year(),
            month: scope.month(),
            totals: VoiceTotalsResponse::from(totals),
        })
    }

    /// Top users of a guild, optionally restricted to one channel
    ///
    /// `limit` defaults to the configured ranking size and is capped at the
    /// configured maximum.
    #[instrument(skip(self))]
    pub async fn get_ranking(
        &self,
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
        year: Option<i32>,
        month: Option<u32>,
        limit: Option<i64>,
    ) -> ServiceResult<RankingResponse> {
        let scope = self.resolve_scope(year, month)?;
        let limit = self.ctx.ranking().effective_limit(limit);

        let rows = self
            .ctx
            .store()
            .read_ranking(&scope.ranking_scope(guild_id, channel_id), limit)
            .await?;

        let entries = rows
            .into_iter()
            .zip(1_i64..)
            .map(|(row, rank)| RankingEntryResponse {
                rank,
                user_id: row.user_id.to_string(),
                totals: VoiceTotalsResponse::from(row.totals),
            })
            .collect::<Vec<_>>();

        debug!(%guild_id, ?scope, limit, returned = entries.len(), "Ranking read");
        Ok(RankingResponse {
            guild_id: guild_id.to_string(),
            channel_id: channel_id.map(|c| c.to_string()),
            year: scope.year(),
            month: scope.month(),
            entries,
        })
    }

    /// One user's position in the guild ranking
    #[instrument(skip(self))]
    pub async fn get_user_rank(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        channel_id: Option<Snowflake>,
        year: Option<i32>,
        month: Option<u32>,
    ) -> ServiceResult<UserRankResponse> {
        let scope = self.resolve_scope(year, month)?;
        let rank = self
            .ctx
            .store()
            .read_user_rank(&scope.ranking_scope(guild_id, channel_id), user_id)
            .await?;

        Ok(UserRankResponse {
            guild_id: guild_id.to_string(),
            user_id: user_id.to_string(),
            rank: rank.rank,
            year: scope.year(),
            month: scope.month(),
            totals: VoiceTotalsResponse::from(rank.totals),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use vc_common::RankingConfig;
    use vc_core::traits::ManualClock;
    use vc_db::MemoryVoiceStore;

    use crate::services::{AccountingService, ServiceContextBuilder};

    // 2024-03-15T12:00:00Z
    const NOW: i64 = 1_710_504_000;
    const GUILD: Snowflake = Snowflake::new(1);
    const CH_A: Snowflake = Snowflake::new(100);
    const CH_B: Snowflake = Snowflake::new(200);

    fn context(store: &MemoryVoiceStore, clock: Arc<ManualClock>) -> ServiceContext {
        ServiceContextBuilder::new()
            .store(Arc::new(store.clone()))
            .clock(clock)
            .startup_time(NOW)
            .ranking(RankingConfig {
                default_limit: 2,
                max_limit: 3,
            })
            .build()
            .unwrap()
    }

    /// Connect `user` to `channel` for `connected` seconds, the first `mic_on`
    /// of them unmuted
    async fn session(
        ctx: &ServiceContext,
        clock: &ManualClock,
        user: i64,
        channel: Snowflake,
        connected: i64,
        mic_on: i64,
    ) {
        let svc = AccountingService::new(ctx);
        let user = Snowflake::new(user);
        svc.on_join(GUILD, user, channel, false).await.unwrap();
        clock.advance(mic_on);
        svc.on_mute_toggle(GUILD, user, channel, false, true, NOW)
            .await
            .unwrap();
        clock.advance(connected - mic_on);
        svc.on_leave(GUILD, user, channel, true, NOW).await.unwrap();
    }

    #[test]
    fn test_resolve_scope() {
        let store = MemoryVoiceStore::new();
        let ctx = context(&store, Arc::new(ManualClock::new(NOW)));
        let svc = QueryService::new(&ctx);

        assert_eq!(
            svc.resolve_scope(None, None).unwrap(),
            QueryScope::Monthly(Period { year: 2024, month: 3 })
        );
        assert_eq!(
            svc.resolve_scope(Some(2023), None).unwrap(),
            QueryScope::Yearly(2023)
        );
        assert_eq!(
            svc.resolve_scope(None, Some(2)).unwrap(),
            QueryScope::Monthly(Period { year: 2024, month: 2 })
        );
        assert_eq!(
            svc.resolve_scope(Some(2023), Some(11)).unwrap(),
            QueryScope::Monthly(Period { year: 2023, month: 11 })
        );
    }

    #[test]
    fn test_future_dates_are_rejected() {
        let store = MemoryVoiceStore::new();
        let ctx = context(&store, Arc::new(ManualClock::new(NOW)));
        let svc = QueryService::new(&ctx);

        let next_year = svc.resolve_scope(Some(2025), None).unwrap_err();
        assert_eq!(next_year.error_code(), "FUTURE_DATE");

        let next_month = svc.resolve_scope(Some(2024), Some(4)).unwrap_err();
        assert_eq!(next_month.error_code(), "FUTURE_DATE");

        let month_only = svc.resolve_scope(None, Some(4)).unwrap_err();
        assert_eq!(month_only.error_code(), "FUTURE_DATE");

        assert!(svc.resolve_scope(Some(2024), Some(3)).is_ok());
        // Current year alone checks January
        assert!(svc.resolve_scope(Some(2024), None).is_ok());
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        let store = MemoryVoiceStore::new();
        let ctx = context(&store, Arc::new(ManualClock::new(NOW)));
        let err = QueryService::new(&ctx).resolve_scope(None, Some(13)).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_summary_monthly_and_yearly() {
        let store = MemoryVoiceStore::new();
        let clock = Arc::new(ManualClock::new(NOW));
        let ctx = context(&store, clock.clone());
        let svc = QueryService::new(&ctx);
        let user = Snowflake::new(7);

        session(&ctx, &clock, 7, CH_A, 3_600, 600).await;

        let monthly = svc.get_summary(GUILD, user, CH_A, None, None).await.unwrap();
        assert_eq!(monthly.month, Some(3));
        assert_eq!(monthly.totals.connection.total_seconds, 3_600);
        assert_eq!(monthly.totals.mic_on.total_seconds, 600);
        assert_eq!(monthly.totals.quiet.display, "000h 50m 00s");

        let yearly = svc
            .get_summary(GUILD, user, CH_A, Some(2024), None)
            .await
            .unwrap();
        assert_eq!(yearly.month, None);
        assert_eq!(yearly.totals.connection.total_seconds, 3_600);
    }

    #[tokio::test]
    async fn test_summary_without_rows() {
        let store = MemoryVoiceStore::new();
        let clock = Arc::new(ManualClock::new(NOW));
        let ctx = context(&store, clock.clone());
        let svc = QueryService::new(&ctx);
        let user = Snowflake::new(7);

        // Unknown member
        let err = svc.get_summary(GUILD, user, CH_A, None, None).await.unwrap_err();
        assert_eq!(err.error_code(), "NO_DATA");
        let yearly = svc
            .get_summary(GUILD, user, CH_A, Some(2023), None)
            .await
            .unwrap();
        assert_eq!(yearly.totals.connection.total_seconds, 0);

        // Known member, other month
        session(&ctx, &clock, 7, CH_A, 60, 0).await;
        let err = svc
            .get_summary(GUILD, user, CH_A, Some(2024), Some(1))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_ranking_order_and_limits() {
        let store = MemoryVoiceStore::new();
        let clock = Arc::new(ManualClock::new(NOW));
        let ctx = context(&store, clock.clone());
        let svc = QueryService::new(&ctx);

        // quiet: user 1 = 100, user 2 = 300, user 3 = 300 with more connection
        session(&ctx, &clock, 1, CH_A, 200, 100).await;
        session(&ctx, &clock, 2, CH_A, 400, 100).await;
        session(&ctx, &clock, 3, CH_B, 500, 200).await;

        let default = svc.get_ranking(GUILD, None, None, None, None).await.unwrap();
        let users: Vec<_> = default.entries.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(users, vec!["3", "2"]);
        assert_eq!(default.entries[0].rank, 1);
        assert_eq!(default.entries[1].rank, 2);

        let capped = svc
            .get_ranking(GUILD, None, None, None, Some(50))
            .await
            .unwrap();
        assert_eq!(capped.entries.len(), 3);

        let channel = svc
            .get_ranking(GUILD, Some(CH_A), None, None, Some(3))
            .await
            .unwrap();
        let users: Vec<_> = channel.entries.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(users, vec!["2", "1"]);
        assert_eq!(channel.channel_id.as_deref(), Some("100"));
    }

    #[tokio::test]
    async fn test_user_rank_matches_ranking_position() {
        let store = MemoryVoiceStore::new();
        let clock = Arc::new(ManualClock::new(NOW));
        let ctx = context(&store, clock.clone());
        let svc = QueryService::new(&ctx);

        session(&ctx, &clock, 1, CH_A, 200, 100).await;
        session(&ctx, &clock, 2, CH_A, 400, 100).await;
        session(&ctx, &clock, 3, CH_A, 300, 0).await;

        let ranking = svc
            .get_ranking(GUILD, None, Some(2024), None, Some(3))
            .await
            .unwrap();
        for entry in &ranking.entries {
            let user = Snowflake::parse(&entry.user_id).unwrap();
            let rank = svc
                .get_user_rank(GUILD, user, None, Some(2024), None)
                .await
                .unwrap();
            assert_eq!(rank.rank, entry.rank);
            assert_eq!(rank.totals, entry.totals);
        }

        let missing = svc
            .get_user_rank(GUILD, Snowflake::new(99), None, None, None)
            .await
            .unwrap_err();
        assert_eq!(missing.error_code(), "NO_DATA");
    }
}
