//! Voice state updates and the transitions they imply
//!
//! The platform reports a member's voice state before and after each change.
//! At most one accounting transition is derived from a pair; a channel
//! change wins over a mute change that happened in the same update.

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// A member's voice state at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceState {
    pub channel_id: Snowflake,
    #[serde(default)]
    pub self_mute: bool,
}

/// Raw update as delivered by the presence source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceStateUpdate {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    /// `None` when the member was not in a voice channel
    pub before: Option<VoiceState>,
    /// `None` when the member is no longer in a voice channel
    pub after: Option<VoiceState>,
}

/// Accounting-relevant transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceTransition {
    Join {
        channel_id: Snowflake,
        self_mute: bool,
    },
    Leave {
        channel_id: Snowflake,
        self_mute: bool,
    },
    Move {
        from_channel_id: Snowflake,
        to_channel_id: Snowflake,
        self_mute_at_leave: bool,
        self_mute_at_join: bool,
    },
    MuteToggle {
        channel_id: Snowflake,
        old_self_mute: bool,
        new_self_mute: bool,
    },
}

impl PresenceTransition {
    /// Get the transition type name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "JOIN",
            Self::Leave { .. } => "LEAVE",
            Self::Move { .. } => "MOVE",
            Self::MuteToggle { .. } => "MUTE_TOGGLE",
        }
    }
}

impl VoiceStateUpdate {
    /// Derive the transition this update represents, if any.
    ///
    /// Deafen, video, and other state changes that keep both the channel
    /// and the mute flag yield `None`.
    pub fn transition(&self) -> Option<PresenceTransition> {
        match (self.before, self.after) {
            (None, Some(after)) => Some(PresenceTransition::Join {
                channel_id: after.channel_id,
                self_mute: after.self_mute,
            }),
            (Some(before), None) => Some(PresenceTransition::Leave {
                channel_id: before.channel_id,
                self_mute: before.self_mute,
            }),
            (Some(before), Some(after)) if before.channel_id != after.channel_id => {
                Some(PresenceTransition::Move {
                    from_channel_id: before.channel_id,
                    to_channel_id: after.channel_id,
                    self_mute_at_leave: before.self_mute,
                    self_mute_at_join: after.self_mute,
                })
            }
            (Some(before), Some(after)) if before.self_mute != after.self_mute => {
                Some(PresenceTransition::MuteToggle {
                    channel_id: before.channel_id,
                    old_self_mute: before.self_mute,
                    new_self_mute: after.self_mute,
                })
            }
            _ => None,
        }
    }
}
