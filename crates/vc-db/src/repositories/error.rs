//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use vc_core::entities::SummaryKey;
use vc_core::error::DomainError;
use vc_core::value_objects::Snowflake;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Create a "summary row missing" error for an add-delta that matched nothing
pub fn summary_missing(key: &SummaryKey) -> DomainError {
    DomainError::SummaryMissing {
        membership_id: key.membership_id,
        channel_id: key.channel_id,
        year: key.period.year,
        month: key.period.month,
    }
}

/// Create an error for an update aimed at a guild that was never ensured
pub fn guild_not_registered(id: Snowflake) -> DomainError {
    DomainError::DatabaseError(format!("guild {id} is not registered"))
}

/// Create an error for an update aimed at a user that was never ensured
pub fn user_not_registered(id: Snowflake) -> DomainError {
    DomainError::DatabaseError(format!("user {id} is not registered"))
}
