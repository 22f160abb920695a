//! Test fixtures and data generators
//!
//! Voice state update builders and the response shapes tests read back.

use serde::{Deserialize, Serialize};

/// Guild used by most tests
pub const GUILD: i64 = 1;
/// Voice channels
pub const CHANNEL_A: i64 = 100;
pub const CHANNEL_B: i64 = 200;

/// Voice state update request
#[derive(Debug, Clone, Serialize)]
pub struct VoiceEventBody {
    pub guild_id: String,
    pub user_id: String,
    pub before: Option<VoiceStateBody>,
    pub after: Option<VoiceStateBody>,
}

/// One side of a voice state update
#[derive(Debug, Clone, Serialize)]
pub struct VoiceStateBody {
    pub channel_id: String,
    pub self_mute: bool,
}

fn state(channel: i64, self_mute: bool) -> VoiceStateBody {
    VoiceStateBody {
        channel_id: channel.to_string(),
        self_mute,
    }
}

impl VoiceEventBody {
    fn new(user: i64, before: Option<VoiceStateBody>, after: Option<VoiceStateBody>) -> Self {
        Self {
            guild_id: GUILD.to_string(),
            user_id: user.to_string(),
            before,
            after,
        }
    }

    pub fn join(user: i64, channel: i64, self_mute: bool) -> Self {
        Self::new(user, None, Some(state(channel, self_mute)))
    }

    pub fn leave(user: i64, channel: i64, self_mute: bool) -> Self {
        Self::new(user, Some(state(channel, self_mute)), None)
    }

    pub fn mute(user: i64, channel: i64, old_self_mute: bool, new_self_mute: bool) -> Self {
        Self::new(
            user,
            Some(state(channel, old_self_mute)),
            Some(state(channel, new_self_mute)),
        )
    }

    pub fn moved(user: i64, from: i64, to: i64, self_mute: bool) -> Self {
        Self::new(
            user,
            Some(state(from, self_mute)),
            Some(state(to, self_mute)),
        )
    }
}

/// Ingest acknowledgement
#[derive(Debug, Deserialize)]
pub struct EventAck {
    pub guild_id: String,
    pub user_id: String,
    pub transition: Option<String>,
}

/// Formatted duration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DurationBody {
    pub total_seconds: u64,
    pub display: String,
}

/// Connection, mic-on, and quiet durations
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TotalsBody {
    pub connection: DurationBody,
    pub mic_on: DurationBody,
    pub quiet: DurationBody,
}

/// Summary response
#[derive(Debug, Deserialize)]
pub struct SummaryBody {
    pub channel_id: String,
    pub year: i32,
    pub month: Option<u32>,
    pub totals: TotalsBody,
}

/// Ranking entry
#[derive(Debug, Deserialize)]
pub struct RankingEntryBody {
    pub rank: i64,
    pub user_id: String,
    pub totals: TotalsBody,
}

/// Ranking response
#[derive(Debug, Deserialize)]
pub struct RankingBody {
    pub guild_id: String,
    pub month: Option<u32>,
    pub entries: Vec<RankingEntryBody>,
}

/// User rank response
#[derive(Debug, Deserialize)]
pub struct UserRankBody {
    pub rank: i64,
    pub totals: TotalsBody,
}

/// Guild settings
#[derive(Debug, Serialize, Deserialize)]
pub struct GuildSettingsBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    pub notification_channel: Option<String>,
}

impl GuildSettingsBody {
    pub fn update(channel: Option<i64>) -> Self {
        Self {
            guild_id: None,
            notification_channel: channel.map(|c| c.to_string()),
        }
    }
}

/// Command usage counter
#[derive(Debug, Deserialize)]
pub struct CommandUsageBody {
    pub user_id: String,
    pub command_count: u64,
}
