//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain values to response DTOs.

use vc_core::entities::{Guild, SummaryTotals};
use vc_core::FormattedDuration;

use super::responses::{DurationResponse, GuildSettingsResponse, VoiceTotalsResponse};

impl From<FormattedDuration> for DurationResponse {
    fn from(d: FormattedDuration) -> Self {
        Self {
            hours: d.hours,
            minutes: d.minutes,
            seconds: d.seconds,
            total_seconds: d.total_seconds,
            display: d.to_string(),
        }
    }
}

impl From<SummaryTotals> for VoiceTotalsResponse {
    fn from(totals: SummaryTotals) -> Self {
        Self {
            connection: FormattedDuration::from_seconds(totals.total_connection_time).into(),
            mic_on: FormattedDuration::from_seconds(totals.total_mic_on_time).into(),
            quiet: FormattedDuration::from_seconds(totals.quiet_time()).into(),
        }
    }
}

impl From<&Guild> for GuildSettingsResponse {
    fn from(guild: &Guild) -> Self {
        Self {
            guild_id: guild.id.to_string(),
            notification_channel: guild.notification_channel.map(|c| c.to_string()),
        }
    }
}
