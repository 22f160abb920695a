//! Open voice session - an in-progress presence segment

use serde::Serialize;

use crate::value_objects::{MembershipId, Snowflake};

/// One not-yet-accounted segment of a member's time in a voice channel
///
/// A segment ends whenever the member leaves, moves, or flips their mute
/// state, so `mic_on` holds for the whole segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpenSession {
    pub membership_id: MembershipId,
    pub channel_id: Snowflake,
    /// Unix seconds at which the segment started
    pub event_time: i64,
    pub mic_on: bool,
}

impl OpenSession {
    pub fn new(membership_id: MembershipId, channel_id: Snowflake, event_time: i64, mic_on: bool) -> Self {
        Self {
            membership_id,
            channel_id,
            event_time,
            mic_on,
        }
    }

    /// Seconds between the segment start and `now`; negative on clock skew
    #[inline]
    pub fn elapsed_until(&self, now: i64) -> i64 {
        now - self.event_time
    }
}

/// Platform reports `self_mute`; true means the microphone is off.
#[inline]
pub const fn mic_on_from_self_mute(self_mute: bool) -> bool {
    !self_mute
}
