//! Guild database model

use sqlx::FromRow;

/// Database model for guilds table
#[derive(Debug, Clone, FromRow)]
pub struct GuildModel {
    pub guild_id: i64,
    pub notification_channel: Option<i64>,
}
