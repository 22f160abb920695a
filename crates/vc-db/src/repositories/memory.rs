//! In-memory implementation of VoiceStore
//!
//! Keeps every table in plain maps behind one async mutex. A unit of work
//! holds the lock for its whole lifetime and edits a private copy of the
//! state; `commit` swaps the copy in, dropping discards it. This gives the
//! same all-or-nothing behavior as a Postgres transaction, which makes the
//! store suitable for exercising the accounting engine without a database.
//!
//! All data is lost when the store is dropped.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use vc_core::entities::{
    Guild, Membership, OpenSession, RankingRow, RankingScope, SummaryKey, SummaryTotals, User,
    UserRank,
};
use vc_core::error::DomainError;
use vc_core::traits::{
    IdentityRepository, RepoResult, SessionRepository, SummaryRepository, VoiceStore,
    VoiceUnitOfWork,
};
use vc_core::value_objects::{MembershipId, Snowflake};

use super::error::{guild_not_registered, summary_missing, user_not_registered};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    guilds: BTreeMap<Snowflake, Guild>,
    users: BTreeMap<Snowflake, User>,
    memberships: BTreeMap<(Snowflake, Snowflake), Membership>,
    last_membership_id: i64,
    summaries: HashMap<SummaryKey, SummaryTotals>,
    sessions: BTreeMap<(MembershipId, Snowflake), OpenSession>,
}

impl MemoryState {
    fn guild_of(&self, membership_id: MembershipId) -> Option<(Snowflake, Snowflake)> {
        self.memberships
            .values()
            .find(|m| m.id == membership_id)
            .map(|m| (m.guild_id, m.user_id))
    }

    /// Every user with rows in scope, best first
    fn ranked(&self, scope: &RankingScope) -> Vec<RankingRow> {
        let mut per_user: BTreeMap<Snowflake, SummaryTotals> = BTreeMap::new();

        for (key, totals) in &self.summaries {
            if key.period.year != scope.year
                || scope.month.is_some_and(|m| m != key.period.month)
                || scope.channel_id.is_some_and(|c| c != key.channel_id)
            {
                continue;
            }
            let Some((guild_id, user_id)) = self.guild_of(key.membership_id) else {
                continue;
            };
            if guild_id != scope.guild_id {
                continue;
            }
            let entry = per_user.entry(user_id).or_default();
            entry.total_connection_time += totals.total_connection_time;
            entry.total_mic_on_time += totals.total_mic_on_time;
        }

        let mut rows: Vec<RankingRow> = per_user
            .into_iter()
            .map(|(user_id, totals)| RankingRow { user_id, totals })
            .collect();
        rows.sort_by(RankingRow::ranking_cmp);
        rows
    }

    fn add(&mut self, key: &SummaryKey, connection: i64, mic: i64) -> RepoResult<()> {
        let totals = self
            .summaries
            .get_mut(key)
            .ok_or_else(|| summary_missing(key))?;
        totals.total_connection_time += connection;
        totals.total_mic_on_time += mic;
        Ok(())
    }
}

/// In-memory voice store.
///
/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryVoiceStore {
    state: Arc<Mutex<MemoryState>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl MemoryVoiceStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `commit` fail and roll its unit of work back
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Number of summary rows (for testing)
    pub async fn summary_count(&self) -> usize {
        self.state.lock().await.summaries.len()
    }

    /// Number of membership rows (for testing)
    pub async fn membership_count(&self) -> usize {
        self.state.lock().await.memberships.len()
    }

    /// Stored user, if any (for testing)
    pub async fn user(&self, user_id: Snowflake) -> Option<User> {
        self.state.lock().await.users.get(&user_id).cloned()
    }
}

/// Unit of work over [`MemoryVoiceStore`]
pub struct MemoryUnitOfWork {
    guard: Option<OwnedMutexGuard<MemoryState>>,
    working: MemoryState,
    fail_commit: Arc<AtomicBool>,
}

impl MemoryUnitOfWork {
    fn state(&mut self) -> RepoResult<&mut MemoryState> {
        if self.guard.is_none() {
            return Err(DomainError::TransactionClosed);
        }
        Ok(&mut self.working)
    }
}

#[async_trait]
impl IdentityRepository for MemoryUnitOfWork {
    async fn ensure_guild(&mut self, guild_id: Snowflake) -> RepoResult<Guild> {
        let state = self.state()?;
        if let Some(guild) = state.guilds.get(&guild_id) {
            debug!(%guild_id, "Guild already registered");
            return Ok(guild.clone());
        }
        let guild = Guild::new(guild_id);
        state.guilds.insert(guild_id, guild.clone());
        info!(%guild_id, "Registered guild");
        Ok(guild)
    }

    async fn ensure_user(&mut self, user_id: Snowflake) -> RepoResult<User> {
        let state = self.state()?;
        if let Some(user) = state.users.get(&user_id) {
            debug!(%user_id, "User already registered");
            return Ok(user.clone());
        }
        let user = User::new(user_id);
        state.users.insert(user_id, user.clone());
        info!(%user_id, "Registered user");
        Ok(user)
    }

    async fn ensure_membership(
        &mut self,
        guild_id: Snowflake,
        user_id: Snowflake,
        join_date: i64,
    ) -> RepoResult<Membership> {
        self.ensure_guild(guild_id).await?;
        self.ensure_user(user_id).await?;

        let state = self.state()?;
        if let Some(member) = state.memberships.get(&(guild_id, user_id)) {
            debug!(%guild_id, %user_id, membership_id = %member.id, "Membership already registered");
            return Ok(member.clone());
        }

        state.last_membership_id += 1;
        let member = Membership {
            id: MembershipId::new(state.last_membership_id),
            guild_id,
            user_id,
            join_date: Some(join_date),
        };
        state
            .memberships
            .insert((guild_id, user_id), member.clone());
        info!(%guild_id, %user_id, membership_id = %member.id, "Registered membership");
        Ok(member)
    }

    async fn set_notification_channel(
        &mut self,
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
    ) -> RepoResult<Guild> {
        let state = self.state()?;
        let guild = state
            .guilds
            .get_mut(&guild_id)
            .ok_or_else(|| guild_not_registered(guild_id))?;
        guild.notification_channel = channel_id;
        Ok(guild.clone())
    }

    async fn increment_command_count(&mut self, user_id: Snowflake) -> RepoResult<User> {
        let state = self.state()?;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| user_not_registered(user_id))?;
        user.command_count += 1;
        Ok(user.clone())
    }
}

#[async_trait]
impl SummaryRepository for MemoryUnitOfWork {
    async fn ensure_summary(&mut self, key: &SummaryKey) -> RepoResult<()> {
        let state = self.state()?;
        state.summaries.entry(*key).or_default();
        Ok(())
    }

    async fn add_connection_time(&mut self, key: &SummaryKey, delta: i64) -> RepoResult<()> {
        self.state()?.add(key, delta, 0)
    }

    async fn add_connection_and_mic_time(
        &mut self,
        key: &SummaryKey,
        delta: i64,
    ) -> RepoResult<()> {
        self.state()?.add(key, delta, delta)
    }
}

#[async_trait]
impl SessionRepository for MemoryUnitOfWork {
    async fn open_session(&mut self, session: &OpenSession) -> RepoResult<Option<OpenSession>> {
        let state = self.state()?;
        Ok(state
            .sessions
            .insert((session.membership_id, session.channel_id), *session))
    }

    async fn close_session(
        &mut self,
        membership_id: MembershipId,
        channel_id: Snowflake,
    ) -> RepoResult<Option<OpenSession>> {
        let state = self.state()?;
        Ok(state.sessions.remove(&(membership_id, channel_id)))
    }

    async fn clear_sessions(&mut self) -> RepoResult<u64> {
        let state = self.state()?;
        let count = state.sessions.len() as u64;
        state.sessions.clear();
        Ok(count)
    }

    async fn drain_sessions(&mut self) -> RepoResult<Vec<OpenSession>> {
        let state = self.state()?;
        Ok(std::mem::take(&mut state.sessions).into_values().collect())
    }
}

#[async_trait]
impl VoiceUnitOfWork for MemoryUnitOfWork {
    async fn commit(&mut self) -> RepoResult<()> {
        let mut guard = self.guard.take().ok_or(DomainError::TransactionClosed)?;
        if self.fail_commit.swap(false, Ordering::SeqCst) {
            return Err(DomainError::DatabaseError(
                "commit rejected by memory store".to_string(),
            ));
        }
        *guard = std::mem::take(&mut self.working);
        Ok(())
    }
}

#[async_trait]
impl VoiceStore for MemoryVoiceStore {
    async fn begin(&self) -> RepoResult<Box<dyn VoiceUnitOfWork>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryUnitOfWork {
            guard: Some(guard),
            working,
            fail_commit: Arc::clone(&self.fail_next_commit),
        }))
    }

    async fn find_guild(&self, guild_id: Snowflake) -> RepoResult<Option<Guild>> {
        Ok(self.state.lock().await.guilds.get(&guild_id).cloned())
    }

    async fn find_membership(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Membership>> {
        Ok(self
            .state
            .lock()
            .await
            .memberships
            .get(&(guild_id, user_id))
            .cloned())
    }

    async fn read_summary(&self, key: &SummaryKey) -> RepoResult<SummaryTotals> {
        self.state
            .lock()
            .await
            .summaries
            .get(key)
            .copied()
            .ok_or(DomainError::NoData)
    }

    async fn read_yearly_summary(
        &self,
        membership_id: MembershipId,
        channel_id: Snowflake,
        year: i32,
    ) -> RepoResult<SummaryTotals> {
        let state = self.state.lock().await;
        let totals = state
            .summaries
            .iter()
            .filter(|(key, _)| {
                key.membership_id == membership_id
                    && key.channel_id == channel_id
                    && key.period.year == year
            })
            .fold(SummaryTotals::default(), |acc, (_, t)| {
                SummaryTotals::new(
                    acc.total_connection_time + t.total_connection_time,
                    acc.total_mic_on_time + t.total_mic_on_time,
                )
            });
        Ok(totals)
    }

    async fn read_ranking(&self, scope: &RankingScope, limit: i64) -> RepoResult<Vec<RankingRow>> {
        let mut rows = self.state.lock().await.ranked(scope);
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn read_user_rank(
        &self,
        scope: &RankingScope,
        user_id: Snowflake,
    ) -> RepoResult<UserRank> {
        let rows = self.state.lock().await.ranked(scope);
        rows.iter()
            .position(|row| row.user_id == user_id)
            .map(|idx| UserRank {
                rank: idx as i64 + 1,
                totals: rows[idx].totals,
            })
            .ok_or(DomainError::NoData)
    }

    async fn list_open_sessions(&self) -> RepoResult<Vec<OpenSession>> {
        Ok(self.state.lock().await.sessions.values().copied().collect())
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}
