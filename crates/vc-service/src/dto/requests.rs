//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Snowflake IDs arrive as strings.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use vc_core::Snowflake;

fn validate_snowflake(value: &str) -> Result<(), ValidationError> {
    Snowflake::parse(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("snowflake").with_message("must be a numeric id".into()))
}

// ============================================================================
// Voice Queries
// ============================================================================

/// Year/month selector for a member's summary
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PeriodQuery {
    #[validate(range(min = 1970, max = 9999, message = "Year must be between 1970 and 9999"))]
    pub year: Option<i32>,

    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: Option<u32>,
}

/// Ranking query parameters
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RankingQuery {
    /// Restrict to one voice channel
    #[validate(custom(function = "validate_snowflake"))]
    pub channel_id: Option<String>,

    #[validate(range(min = 1970, max = 9999, message = "Year must be between 1970 and 9999"))]
    pub year: Option<i32>,

    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: Option<u32>,

    #[validate(range(min = 1, message = "Limit must be at least 1"))]
    pub limit: Option<i64>,
}

impl RankingQuery {
    /// Parsed channel filter; only call after validation
    pub fn channel(&self) -> Option<Snowflake> {
        self.channel_id.as_deref().and_then(|c| Snowflake::parse(c).ok())
    }
}

/// Scope of a single user's rank lookup
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserRankQuery {
    #[validate(custom(function = "validate_snowflake"))]
    pub channel_id: Option<String>,

    #[validate(range(min = 1970, max = 9999, message = "Year must be between 1970 and 9999"))]
    pub year: Option<i32>,

    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: Option<u32>,
}

impl UserRankQuery {
    /// Parsed channel filter; only call after validation
    pub fn channel(&self) -> Option<Snowflake> {
        self.channel_id.as_deref().and_then(|c| Snowflake::parse(c).ok())
    }
}

// ============================================================================
// Voice Events
// ============================================================================

/// Options for submitting a voice state update
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct VoiceEventQuery {
    /// Wait until the update has been accounted before responding
    #[serde(default)]
    pub wait: bool,
}

// ============================================================================
// Guild Settings
// ============================================================================

/// Update guild settings request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGuildSettingsRequest {
    /// Text channel for join/leave announcements, or null to disable
    #[validate(custom(function = "validate_snowflake"))]
    pub notification_channel: Option<String>,
}

impl UpdateGuildSettingsRequest {
    /// Parsed channel; only call after validation
    pub fn channel(&self) -> Option<Snowflake> {
        self.notification_channel
            .as_deref()
            .and_then(|c| Snowflake::parse(c).ok())
    }
}
