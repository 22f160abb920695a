//! Guild model -> entity mapper

use vc_core::entities::Guild;
use vc_core::value_objects::Snowflake;

use crate::models::GuildModel;

impl From<GuildModel> for Guild {
    fn from(model: GuildModel) -> Self {
        Guild {
            id: Snowflake::new(model.guild_id),
            notification_channel: model.notification_channel.map(Snowflake::new),
        }
    }
}
