//! Open session model -> entity mapper

use vc_core::entities::OpenSession;
use vc_core::value_objects::{MembershipId, Snowflake};

use crate::models::SessionModel;

impl From<SessionModel> for OpenSession {
    fn from(model: SessionModel) -> Self {
        OpenSession {
            membership_id: MembershipId::new(model.id),
            channel_id: Snowflake::new(model.channel_id),
            event_time: model.event_time,
            mic_on: model.mic_on,
        }
    }
}
