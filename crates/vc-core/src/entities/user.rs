//! User entity

use serde::Serialize;

use crate::value_objects::Snowflake;

/// User record
///
/// `speaker_id` and `likeability` belong to the chat front-end; they are
/// persisted with their defaults and otherwise left alone here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Snowflake,
    pub command_count: i64,
    pub speaker_id: i32,
    pub likeability: i32,
}

impl User {
    pub const DEFAULT_SPEAKER_ID: i32 = 1;

    /// Create a user with default counters
    pub fn new(id: Snowflake) -> Self {
        Self {
            id,
            command_count: 0,
            speaker_id: Self::DEFAULT_SPEAKER_ID,
            likeability: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_defaults() {
        let user = User::new(Snowflake::new(42));
        assert_eq!(user.command_count, 0);
        assert_eq!(user.speaker_id, 1);
        assert_eq!(user.likeability, 0);
    }
}
