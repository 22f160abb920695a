//! PostgreSQL implementation of VoiceStore

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use vc_core::entities::{
    Guild, Membership, OpenSession, RankingRow, RankingScope, SummaryKey, SummaryTotals, UserRank,
};
use vc_core::error::DomainError;
use vc_core::traits::{RepoResult, VoiceStore, VoiceUnitOfWork};
use vc_core::value_objects::{MembershipId, Snowflake};

use crate::models::{
    GuildModel, MembershipModel, RankingRowModel, SessionModel, SummaryTotalsModel, UserRankModel,
};

use super::error::map_db_error;
use super::unit_of_work::PgUnitOfWork;

/// Per-user totals over a ranking scope. Binds: guild, year, month?, channel?
const SCOPED_TOTALS: &str = r"
    SELECT gu.user_id,
           SUM(s.total_connection_time)::BIGINT AS total_connection_time,
           SUM(s.total_mic_on_time)::BIGINT AS total_mic_on_time
    FROM vc_summary s
    JOIN guild_users gu ON gu.id = s.id
    WHERE gu.guild_id = $1
      AND s.year = $2
      AND ($3::INTEGER IS NULL OR s.month = $3)
      AND ($4::BIGINT IS NULL OR s.channel_id = $4)
    GROUP BY gu.user_id
";

/// PostgreSQL implementation of VoiceStore
#[derive(Clone)]
pub struct PgVoiceStore {
    pool: PgPool,
}

impl PgVoiceStore {
    /// Create a new PgVoiceStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn month_param(scope: &RankingScope) -> Option<i32> {
    scope.month.map(|m| m as i32)
}

#[async_trait]
impl VoiceStore for PgVoiceStore {
    async fn begin(&self) -> RepoResult<Box<dyn VoiceUnitOfWork>> {
        let uow = PgUnitOfWork::begin(&self.pool).await?;
        Ok(Box::new(uow))
    }

    #[instrument(skip(self))]
    async fn find_guild(&self, guild_id: Snowflake) -> RepoResult<Option<Guild>> {
        let result = sqlx::query_as::<_, GuildModel>(
            r"
            SELECT guild_id, notification_channel
            FROM guilds
            WHERE guild_id = $1
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Guild::from))
    }

    #[instrument(skip(self))]
    async fn find_membership(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Membership>> {
        let result = sqlx::query_as::<_, MembershipModel>(
            r"
            SELECT id, guild_id, user_id, join_date
            FROM guild_users
            WHERE guild_id = $1 AND user_id = $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Membership::from))
    }

    #[instrument(skip(self))]
    async fn read_summary(&self, key: &SummaryKey) -> RepoResult<SummaryTotals> {
        let result = sqlx::query_as::<_, SummaryTotalsModel>(
            r"
            SELECT total_connection_time, total_mic_on_time
            FROM vc_summary
            WHERE id = $1 AND channel_id = $2 AND year = $3 AND month = $4
            ",
        )
        .bind(key.membership_id.into_inner())
        .bind(key.channel_id.into_inner())
        .bind(key.period.year)
        .bind(key.period.month as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(SummaryTotals::from).ok_or(DomainError::NoData)
    }

    #[instrument(skip(self))]
    async fn read_yearly_summary(
        &self,
        membership_id: MembershipId,
        channel_id: Snowflake,
        year: i32,
    ) -> RepoResult<SummaryTotals> {
        let result = sqlx::query_as::<_, SummaryTotalsModel>(
            r"
            SELECT COALESCE(SUM(total_connection_time), 0)::BIGINT AS total_connection_time,
                   COALESCE(SUM(total_mic_on_time), 0)::BIGINT AS total_mic_on_time
            FROM vc_summary
            WHERE id = $1 AND channel_id = $2 AND year = $3
            ",
        )
        .bind(membership_id.into_inner())
        .bind(channel_id.into_inner())
        .bind(year)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(SummaryTotals::from(result))
    }

    #[instrument(skip(self))]
    async fn read_ranking(&self, scope: &RankingScope, limit: i64) -> RepoResult<Vec<RankingRow>> {
        let sql = format!(
            r"
            WITH totals AS ({SCOPED_TOTALS})
            SELECT user_id, total_connection_time, total_mic_on_time
            FROM totals
            ORDER BY (total_connection_time - total_mic_on_time) DESC,
                     total_connection_time DESC,
                     user_id ASC
            LIMIT $5
            "
        );

        let results = sqlx::query_as::<_, RankingRowModel>(&sql)
            .bind(scope.guild_id.into_inner())
            .bind(scope.year)
            .bind(month_param(scope))
            .bind(scope.channel_id.map(Snowflake::into_inner))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(RankingRow::from).collect())
    }

    /// Position under the full ranking order, not 1 + the number of users
    /// with strictly more quiet time
    #[instrument(skip(self))]
    async fn read_user_rank(
        &self,
        scope: &RankingScope,
        user_id: Snowflake,
    ) -> RepoResult<UserRank> {
        let sql = format!(
            r"
            WITH totals AS ({SCOPED_TOTALS}),
            ranked AS (
                SELECT user_id, total_connection_time, total_mic_on_time,
                       ROW_NUMBER() OVER (
                           ORDER BY (total_connection_time - total_mic_on_time) DESC,
                                    total_connection_time DESC,
                                    user_id ASC
                       ) AS rank
                FROM totals
            )
            SELECT rank, total_connection_time, total_mic_on_time
            FROM ranked
            WHERE user_id = $5
            "
        );

        let result = sqlx::query_as::<_, UserRankModel>(&sql)
            .bind(scope.guild_id.into_inner())
            .bind(scope.year)
            .bind(month_param(scope))
            .bind(scope.channel_id.map(Snowflake::into_inner))
            .bind(user_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(UserRank::from).ok_or(DomainError::NoData)
    }

    #[instrument(skip(self))]
    async fn list_open_sessions(&self) -> RepoResult<Vec<OpenSession>> {
        let results = sqlx::query_as::<_, SessionModel>(
            r"
            SELECT id, channel_id, event_time, mic_on
            FROM vc_sessions
            ORDER BY id, channel_id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(OpenSession::from).collect())
    }

    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}
