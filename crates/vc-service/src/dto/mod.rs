//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain values to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    PeriodQuery, RankingQuery, UpdateGuildSettingsRequest, UserRankQuery, VoiceEventQuery,
};

pub use responses::{
    CommandUsageResponse, DurationResponse, GuildSettingsResponse, HealthChecks,
    HealthResponse, RankingEntryResponse, RankingResponse, ReadinessResponse, SummaryResponse,
    UserRankResponse, VoiceEventAcceptedResponse, VoiceTotalsResponse,
};
