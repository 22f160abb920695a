//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{MembershipId, Snowflake};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Query Errors
    // =========================================================================
    #[error("Requested period {year}-{month:02} is in the future")]
    FutureDate { year: i32, month: u32 },

    #[error("No voice data recorded for the requested scope")]
    NoData,

    #[error("Invalid month: {0}")]
    InvalidMonth(u32),

    #[error("Membership not found for guild {guild_id}, user {user_id}")]
    MembershipNotFound {
        guild_id: Snowflake,
        user_id: Snowflake,
    },

    // =========================================================================
    // Accounting Errors
    // =========================================================================
    #[error("No summary row for membership {membership_id}, channel {channel_id}, {year}-{month:02}")]
    SummaryMissing {
        membership_id: MembershipId,
        channel_id: Snowflake,
        year: i32,
        month: u32,
    },

    #[error("Unit of work already finished")]
    TransactionClosed,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::FutureDate { .. } => "FUTURE_DATE",
            Self::NoData => "NO_DATA",
            Self::InvalidMonth(_) => "INVALID_MONTH",
            Self::MembershipNotFound { .. } => "UNKNOWN_MEMBER",
            Self::SummaryMissing { .. } => "SUMMARY_MISSING",
            Self::TransactionClosed => "TRANSACTION_CLOSED",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoData | Self::MembershipNotFound { .. })
    }

    /// Check if this is a validation error (bad caller input)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::FutureDate { .. } | Self::InvalidMonth(_))
    }

    /// Check if this is a storage-level failure
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_) | Self::SummaryMissing { .. } | Self::TransactionClosed
        )
    }
}
