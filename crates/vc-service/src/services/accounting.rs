//! Session accounting service
//!
//! Turns presence transitions into credited seconds. Per (membership,
//! channel) a member is either idle or connected with an open segment
//! `(start, mic_on)`. Closing a segment credits `now - start` to the
//! monthly bucket of `now`; opening one records the new start.
//!
//! Every public transition runs in exactly one unit of work: identity
//! rows, the summary row, the closed segment, and the reopened segment all
//! commit together or not at all.
//!
//! Data integrity problems (a missing or duplicated open segment, mic
//! flags that disagree, time running backwards) are logged and handled
//! with a conservative fallback rather than failing the transition.

use tracing::{debug, error, info, instrument, warn};

use vc_core::entities::{mic_on_from_self_mute, OpenSession, SummaryKey};
use vc_core::events::{PresenceTransition, VoiceStateUpdate};
use vc_core::traits::{
    IdentityRepository, SessionRepository, SummaryRepository, VoiceStore, VoiceUnitOfWork,
};
use vc_core::value_objects::{MembershipId, Period, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Session accounting service
pub struct AccountingService<'a> {
    ctx: &'a ServiceContext,
}

/// Credit `elapsed` seconds to the bucket of `now`
///
/// `stored_mic_on` is the flag recorded when the segment opened and
/// `reported_mic_on` the flag the closing event carries. Returns the
/// seconds actually credited.
async fn apply_elapsed(
    uow: &mut dyn VoiceUnitOfWork,
    membership_id: MembershipId,
    channel_id: Snowflake,
    elapsed: i64,
    stored_mic_on: bool,
    reported_mic_on: bool,
    now: i64,
) -> ServiceResult<i64> {
    let key = SummaryKey::new(membership_id, channel_id, Period::from_timestamp(now));

    let elapsed = if elapsed < 0 {
        warn!(
            %membership_id,
            %channel_id,
            elapsed,
            "Negative session length; crediting zero"
        );
        0
    } else {
        elapsed
    };

    uow.ensure_summary(&key).await?;

    if stored_mic_on == reported_mic_on {
        if stored_mic_on {
            uow.add_connection_and_mic_time(&key, elapsed).await?;
        } else {
            uow.add_connection_time(&key, elapsed).await?;
        }
    } else {
        error!(
            %membership_id,
            %channel_id,
            stored_mic_on,
            reported_mic_on,
            elapsed,
            "Mic state mismatch; crediting connection time only"
        );
        uow.add_connection_time(&key, elapsed).await?;
    }

    debug!(%membership_id, %channel_id, period = %key.period, elapsed, "Credited voice time");
    Ok(elapsed)
}

/// Close the open segment for (membership, channel) and credit it
///
/// Without an open segment the member must have joined before this
/// process started, so the segment is taken to run from `startup` with the
/// reported mic state.
async fn close_segment(
    uow: &mut dyn VoiceUnitOfWork,
    membership_id: MembershipId,
    channel_id: Snowflake,
    reported_mic_on: bool,
    now: i64,
    startup: i64,
) -> ServiceResult<i64> {
    match uow.close_session(membership_id, channel_id).await? {
        Some(session) => {
            apply_elapsed(
                uow,
                membership_id,
                channel_id,
                session.elapsed_until(now),
                session.mic_on,
                reported_mic_on,
                now,
            )
            .await
        }
        None => {
            warn!(
                %membership_id,
                %channel_id,
                startup,
                "No open session; counting from process start"
            );
            apply_elapsed(
                uow,
                membership_id,
                channel_id,
                now - startup,
                reported_mic_on,
                reported_mic_on,
                now,
            )
            .await
        }
    }
}

/// Start a new segment, replacing any segment already open for the key
async fn open_segment(
    uow: &mut dyn VoiceUnitOfWork,
    membership_id: MembershipId,
    channel_id: Snowflake,
    mic_on: bool,
    now: i64,
) -> ServiceResult<()> {
    let session = OpenSession::new(membership_id, channel_id, now, mic_on);
    if let Some(displaced) = uow.open_session(&session).await? {
        warn!(
            %membership_id,
            %channel_id,
            displaced_start = displaced.event_time,
            displaced_mic_on = displaced.mic_on,
            "Replaced an open session that was never closed"
        );
    }
    Ok(())
}

impl<'a> AccountingService<'a> {
    /// Create a new AccountingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Member connected to a voice channel
    #[instrument(skip(self))]
    pub async fn on_join(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        channel_id: Snowflake,
        self_mute: bool,
    ) -> ServiceResult<()> {
        let now = self.ctx.now();
        let mut uow = self.ctx.store().begin().await?;

        let member = uow.ensure_membership(guild_id, user_id, now).await?;
        open_segment(
            uow.as_mut(),
            member.id,
            channel_id,
            mic_on_from_self_mute(self_mute),
            now,
        )
        .await?;

        uow.commit().await?;
        info!(%guild_id, %user_id, %channel_id, self_mute, "Voice join");
        Ok(())
    }

    /// Member disconnected from a voice channel
    ///
    /// Returns the seconds credited.
    #[instrument(skip(self))]
    pub async fn on_leave(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        channel_id: Snowflake,
        self_mute_at_leave: bool,
        startup: i64,
    ) -> ServiceResult<i64> {
        let now = self.ctx.now();
        let mut uow = self.ctx.store().begin().await?;

        let member = uow.ensure_membership(guild_id, user_id, now).await?;
        let credited = close_segment(
            uow.as_mut(),
            member.id,
            channel_id,
            mic_on_from_self_mute(self_mute_at_leave),
            now,
            startup,
        )
        .await?;

        uow.commit().await?;
        info!(%guild_id, %user_id, %channel_id, credited, "Voice leave");
        Ok(credited)
    }

    /// Member switched voice channels
    ///
    /// Closes `from` like a leave and opens `to` with the post-move mic
    /// state. Returns the seconds credited to `from`.
    #[instrument(skip(self))]
    #[allow(clippy::too_many_arguments)]
    pub async fn on_move(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        from_channel_id: Snowflake,
        to_channel_id: Snowflake,
        self_mute_at_leave: bool,
        self_mute_at_join: bool,
        startup: i64,
    ) -> ServiceResult<i64> {
        let now = self.ctx.now();
        let mut uow = self.ctx.store().begin().await?;

        let member = uow.ensure_membership(guild_id, user_id, now).await?;
        let credited = close_segment(
            uow.as_mut(),
            member.id,
            from_channel_id,
            mic_on_from_self_mute(self_mute_at_leave),
            now,
            startup,
        )
        .await?;
        open_segment(
            uow.as_mut(),
            member.id,
            to_channel_id,
            mic_on_from_self_mute(self_mute_at_join),
            now,
        )
        .await?;

        uow.commit().await?;
        info!(
            %guild_id,
            %user_id,
            %from_channel_id,
            %to_channel_id,
            credited,
            "Voice move"
        );
        Ok(credited)
    }

    /// Member muted or unmuted without leaving
    ///
    /// Closes the current segment with the old mic state and opens a new one
    /// with the new state. Returns the seconds credited; an update whose
    /// flags are equal changes nothing and returns zero.
    #[instrument(skip(self))]
    pub async fn on_mute_toggle(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        channel_id: Snowflake,
        old_self_mute: bool,
        new_self_mute: bool,
        startup: i64,
    ) -> ServiceResult<i64> {
        if old_self_mute == new_self_mute {
            debug!(%guild_id, %user_id, %channel_id, "Mute state unchanged; ignoring");
            return Ok(0);
        }

        let now = self.ctx.now();
        let mut uow = self.ctx.store().begin().await?;

        let member = uow.ensure_membership(guild_id, user_id, now).await?;
        let credited = close_segment(
            uow.as_mut(),
            member.id,
            channel_id,
            mic_on_from_self_mute(old_self_mute),
            now,
            startup,
        )
        .await?;
        open_segment(
            uow.as_mut(),
            member.id,
            channel_id,
            mic_on_from_self_mute(new_self_mute),
            now,
        )
        .await?;

        uow.commit().await?;
        info!(%guild_id, %user_id, %channel_id, new_self_mute, credited, "Voice mute toggle");
        Ok(credited)
    }

    /// Drop open sessions left behind by a previous process
    ///
    /// Their start times cannot be trusted across a restart; members still
    /// connected are counted from the new process start when they leave.
    #[instrument(skip(self))]
    pub async fn on_startup(&self) -> ServiceResult<u64> {
        let mut uow = self.ctx.store().begin().await?;
        let cleared = uow.clear_sessions().await?;
        uow.commit().await?;

        if cleared > 0 {
            warn!(cleared, "Discarded stale open sessions");
        } else {
            info!("No stale open sessions");
        }
        Ok(cleared)
    }

    /// Close every open session as of now
    ///
    /// Each session is credited with its own stored mic state; segments that
    /// started before `startup` are counted from `startup`. Returns the
    /// number of sessions closed.
    #[instrument(skip(self))]
    pub async fn on_shutdown(&self, startup: i64) -> ServiceResult<u64> {
        let now = self.ctx.now();
        let mut uow = self.ctx.store().begin().await?;

        let sessions = uow.drain_sessions().await?;
        let mut credited_total = 0;
        for session in &sessions {
            let start = session.event_time.max(startup);
            credited_total += apply_elapsed(
                uow.as_mut(),
                session.membership_id,
                session.channel_id,
                now - start,
                session.mic_on,
                session.mic_on,
                now,
            )
            .await?;
        }

        uow.commit().await?;
        info!(closed = sessions.len(), credited_total, "Closed open sessions for shutdown");
        Ok(sessions.len() as u64)
    }

    /// Classify a raw voice state update and apply the matching transition
    ///
    /// Returns the transition applied, or `None` when the update carried no
    /// accounting-relevant change.
    #[instrument(skip(self))]
    pub async fn apply_voice_state(
        &self,
        update: &VoiceStateUpdate,
    ) -> ServiceResult<Option<PresenceTransition>> {
        let Some(transition) = update.transition() else {
            debug!(guild_id = %update.guild_id, user_id = %update.user_id, "No voice transition");
            return Ok(None);
        };

        let startup = self.ctx.startup_time();
        let (guild_id, user_id) = (update.guild_id, update.user_id);

        match transition {
            PresenceTransition::Join {
                channel_id,
                self_mute,
            } => {
                self.on_join(guild_id, user_id, channel_id, self_mute).await?;
            }
            PresenceTransition::Leave {
                channel_id,
                self_mute,
            } => {
                self.on_leave(guild_id, user_id, channel_id, self_mute, startup)
                    .await?;
            }
            PresenceTransition::Move {
                from_channel_id,
                to_channel_id,
                self_mute_at_leave,
                self_mute_at_join,
            } => {
                self.on_move(
                    guild_id,
                    user_id,
                    from_channel_id,
                    to_channel_id,
                    self_mute_at_leave,
                    self_mute_at_join,
                    startup,
                )
                .await?;
            }
            PresenceTransition::MuteToggle {
                channel_id,
                old_self_mute,
                new_self_mute,
            } => {
                self.on_mute_toggle(
                    guild_id,
                    user_id,
                    channel_id,
                    old_self_mute,
                    new_self_mute,
                    startup,
                )
                .await?;
            }
        }

        Ok(Some(transition))
    }
}
