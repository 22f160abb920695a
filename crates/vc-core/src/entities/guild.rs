//! Guild entity - a community whose voice channels are tracked

use serde::Serialize;

use crate::value_objects::Snowflake;

/// Guild (community) record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guild {
    pub id: Snowflake,
    /// Text channel join/leave announcements go to, if configured
    pub notification_channel: Option<Snowflake>,
}

impl Guild {
    /// Create a guild with no notification channel
    pub fn new(id: Snowflake) -> Self {
        Self {
            id,
            notification_channel: None,
        }
    }

    /// Check whether announcements are configured for this guild
    #[inline]
    pub fn has_notification_channel(&self) -> bool {
        self.notification_channel.is_some()
    }
}
