//! Identity service
//!
//! Guild settings and per-user command counters. Guilds and users are
//! registered on first reference, so none of these calls can miss.

use tracing::{info, instrument};

use vc_core::traits::{IdentityRepository, VoiceStore, VoiceUnitOfWork};
use vc_core::Snowflake;

use crate::dto::{CommandUsageResponse, GuildSettingsResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Identity service
pub struct IdentityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IdentityService<'a> {
    /// Create a new IdentityService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Current settings of a guild
    #[instrument(skip(self))]
    pub async fn guild_settings(&self, guild_id: Snowflake) -> ServiceResult<GuildSettingsResponse> {
        let mut uow = self.ctx.store().begin().await?;
        let guild = uow.ensure_guild(guild_id).await?;
        uow.commit().await?;

        Ok(GuildSettingsResponse::from(&guild))
    }

    /// Set or clear the channel join/leave announcements go to
    #[instrument(skip(self))]
    pub async fn set_notification_channel(
        &self,
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
    ) -> ServiceResult<GuildSettingsResponse> {
        let mut uow = self.ctx.store().begin().await?;
        uow.ensure_guild(guild_id).await?;
        let guild = uow.set_notification_channel(guild_id, channel_id).await?;
        uow.commit().await?;

        info!(%guild_id, channel_id = ?channel_id, "Notification channel updated");
        Ok(GuildSettingsResponse::from(&guild))
    }

    /// Count one command invocation by a user
    #[instrument(skip(self))]
    pub async fn record_command_usage(&self, user_id: Snowflake) -> ServiceResult<CommandUsageResponse> {
        let mut uow = self.ctx.store().begin().await?;
        uow.ensure_user(user_id).await?;
        let user = uow.increment_command_count(user_id).await?;
        uow.commit().await?;

        Ok(CommandUsageResponse {
            user_id: user_id.to_string(),
            command_count: u64::try_from(user.command_count).unwrap_or(0),
        })
    }
}
