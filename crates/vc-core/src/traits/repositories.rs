//! Repository traits (ports) - define the interface for data access
//!
//! Writes happen inside a [`VoiceUnitOfWork`]: one storage transaction that
//! either commits as a whole or is rolled back when dropped. The write-side
//! traits are split the same way the data is (identity, summaries, open
//! sessions) and the unit of work is simply all three plus `commit`.
//!
//! Reads that never mutate go straight through [`VoiceStore`].

use async_trait::async_trait;

use crate::entities::{
    Guild, Membership, OpenSession, RankingRow, RankingScope, SummaryKey, SummaryTotals, User,
    UserRank,
};
use crate::error::DomainError;
use crate::value_objects::{MembershipId, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Identity Registry
// ============================================================================

#[async_trait]
pub trait IdentityRepository: Send {
    /// Find or create a guild
    async fn ensure_guild(&mut self, guild_id: Snowflake) -> RepoResult<Guild>;

    /// Find or create a user
    async fn ensure_user(&mut self, user_id: Snowflake) -> RepoResult<User>;

    /// Find or create the membership for (guild, user), creating the guild
    /// and user first when needed. `join_date` only applies on creation.
    async fn ensure_membership(
        &mut self,
        guild_id: Snowflake,
        user_id: Snowflake,
        join_date: i64,
    ) -> RepoResult<Membership>;

    /// Overwrite a guild's notification channel (the guild must exist)
    async fn set_notification_channel(
        &mut self,
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
    ) -> RepoResult<Guild>;

    /// Increment a user's command counter (the user must exist)
    async fn increment_command_count(&mut self, user_id: Snowflake) -> RepoResult<User>;
}

// ============================================================================
// Monthly Summary Store
// ============================================================================

#[async_trait]
pub trait SummaryRepository: Send {
    /// Find or create a zeroed summary row
    async fn ensure_summary(&mut self, key: &SummaryKey) -> RepoResult<()>;

    /// Add to the connection total. Fails with `SummaryMissing` when the
    /// row has not been ensured.
    async fn add_connection_time(&mut self, key: &SummaryKey, delta: i64) -> RepoResult<()>;

    /// Add the same delta to both the connection and mic-on totals
    async fn add_connection_and_mic_time(&mut self, key: &SummaryKey, delta: i64)
        -> RepoResult<()>;
}

// ============================================================================
// Open-Session Tracker
// ============================================================================

#[async_trait]
pub trait SessionRepository: Send {
    /// Insert an open session. If one already existed for the same
    /// (membership, channel) it is replaced and returned.
    async fn open_session(&mut self, session: &OpenSession) -> RepoResult<Option<OpenSession>>;

    /// Read and delete the open session for (membership, channel)
    async fn close_session(
        &mut self,
        membership_id: MembershipId,
        channel_id: Snowflake,
    ) -> RepoResult<Option<OpenSession>>;

    /// Delete every open session, returning how many were removed
    async fn clear_sessions(&mut self) -> RepoResult<u64>;

    /// Delete and return every open session
    async fn drain_sessions(&mut self) -> RepoResult<Vec<OpenSession>>;
}

// ============================================================================
// Unit of Work
// ============================================================================

#[async_trait]
pub trait VoiceUnitOfWork: IdentityRepository + SummaryRepository + SessionRepository {
    /// Commit every change made through this unit of work.
    ///
    /// Dropping a unit of work without committing discards its changes.
    async fn commit(&mut self) -> RepoResult<()>;
}

// ============================================================================
// Store (entry point + read side)
// ============================================================================

#[async_trait]
pub trait VoiceStore: Send + Sync {
    /// Start a new unit of work
    async fn begin(&self) -> RepoResult<Box<dyn VoiceUnitOfWork>>;

    /// Find a guild without creating it
    async fn find_guild(&self, guild_id: Snowflake) -> RepoResult<Option<Guild>>;

    /// Find a membership without creating it
    async fn find_membership(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Membership>>;

    /// Totals for one month. Fails with `NoData` when the row is absent.
    async fn read_summary(&self, key: &SummaryKey) -> RepoResult<SummaryTotals>;

    /// Totals summed over every month of `year`; zero when nothing exists
    async fn read_yearly_summary(
        &self,
        membership_id: MembershipId,
        channel_id: Snowflake,
        year: i32,
    ) -> RepoResult<SummaryTotals>;

    /// Users in scope, best first, at most `limit` rows
    async fn read_ranking(&self, scope: &RankingScope, limit: i64) -> RepoResult<Vec<RankingRow>>;

    /// One user's rank in scope. Fails with `NoData` when the user has no
    /// rows in scope.
    ///
    /// The rank is the user's position in `read_ranking` order, so users
    /// with equal quiet time get distinct ranks.
    async fn read_user_rank(&self, scope: &RankingScope, user_id: Snowflake)
        -> RepoResult<UserRank>;

    /// List currently open sessions
    async fn list_open_sessions(&self) -> RepoResult<Vec<OpenSession>>;

    /// Cheap connectivity probe
    async fn ping(&self) -> RepoResult<()>;
}
