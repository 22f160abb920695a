//! # vc-core
//!
//! Domain layer for voice-channel presence accounting: entities, value
//! objects, presence events, and the storage/clock ports.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    mic_on_from_self_mute, Guild, Membership, OpenSession, RankingRow, RankingScope, SummaryKey,
    SummaryTotals, User, UserRank,
};
pub use error::DomainError;
pub use events::{PresenceTransition, VoiceState, VoiceStateUpdate};
pub use traits::{
    Clock, IdentityRepository, ManualClock, RepoResult, SessionRepository, SummaryRepository,
    SystemClock, VoiceStore, VoiceUnitOfWork,
};
pub use value_objects::{FormattedDuration, MembershipId, Period, Snowflake, SnowflakeParseError};
