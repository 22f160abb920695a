//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Voice Time
// ============================================================================

/// A duration split for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationResponse {
    pub hours: u64,
    pub minutes: u8,
    pub seconds: u8,
    pub total_seconds: u64,
    /// e.g. `"013h 05m 09s"`
    pub display: String,
}

/// Connection, mic-on, and muted time for one scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceTotalsResponse {
    pub connection: DurationResponse,
    pub mic_on: DurationResponse,
    /// Connected while muted
    pub quiet: DurationResponse,
}

/// A member's totals in one channel for a month or a year
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub guild_id: String,
    pub user_id: String,
    pub channel_id: String,
    pub year: i32,
    /// Absent for yearly summaries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub totals: VoiceTotalsResponse,
}

/// One ranking entry
#[derive(Debug, Clone, Serialize)]
pub struct RankingEntryResponse {
    pub rank: i64,
    pub user_id: String,
    pub totals: VoiceTotalsResponse,
}

/// Top-N users in a guild
#[derive(Debug, Clone, Serialize)]
pub struct RankingResponse {
    pub guild_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub entries: Vec<RankingEntryResponse>,
}

/// One user's position in a guild ranking
#[derive(Debug, Clone, Serialize)]
pub struct UserRankResponse {
    pub guild_id: String,
    pub user_id: String,
    pub rank: i64,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub totals: VoiceTotalsResponse,
}

/// Result of accepting a voice state update for processing
#[derive(Debug, Clone, Serialize)]
pub struct VoiceEventAcceptedResponse {
    pub guild_id: String,
    pub user_id: String,
    /// `JOIN`, `LEAVE`, `MOVE`, `MUTE_TOGGLE`, or absent when nothing is accounted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<&'static str>,
}

// ============================================================================
// Guild / User
// ============================================================================

/// Guild settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuildSettingsResponse {
    pub guild_id: String,
    pub notification_channel: Option<String>,
}

/// Command usage counter after an increment
#[derive(Debug, Clone, Serialize)]
pub struct CommandUsageResponse {
    pub user_id: String,
    pub command_count: u64,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
