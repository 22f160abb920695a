//! Path parameter extractors
//!
//! Snowflake IDs arrive as strings and are parsed on access.

use serde::Deserialize;

use vc_core::Snowflake;

use crate::response::ApiError;

fn parse_id(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// Path parameters with guild_id
#[derive(Debug, Deserialize)]
pub struct GuildIdPath {
    pub guild_id: String,
}

impl GuildIdPath {
    /// Parse guild_id as Snowflake
    pub fn guild_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.guild_id, "guild_id")
    }
}

/// Path parameters with user_id
#[derive(Debug, Deserialize)]
pub struct UserIdPath {
    pub user_id: String,
}

impl UserIdPath {
    /// Parse user_id as Snowflake
    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.user_id, "user_id")
    }
}

/// Path parameters with guild_id and user_id
#[derive(Debug, Deserialize)]
pub struct GuildUserPath {
    pub guild_id: String,
    pub user_id: String,
}

impl GuildUserPath {
    /// Parse guild_id as Snowflake
    pub fn guild_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.guild_id, "guild_id")
    }

    /// Parse user_id as Snowflake
    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.user_id, "user_id")
    }
}

/// Path parameters addressing one member's voice channel
#[derive(Debug, Deserialize)]
pub struct GuildUserChannelPath {
    pub guild_id: String,
    pub user_id: String,
    pub channel_id: String,
}

impl GuildUserChannelPath {
    /// Parse all three IDs
    pub fn ids(&self) -> Result<(Snowflake, Snowflake, Snowflake), ApiError> {
        Ok((
            parse_id(&self.guild_id, "guild_id")?,
            parse_id(&self.user_id, "user_id")?,
            parse_id(&self.channel_id, "channel_id")?,
        ))
    }
}
