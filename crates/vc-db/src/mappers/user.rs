//! User model -> entity mapper

use vc_core::entities::User;
use vc_core::value_objects::Snowflake;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.user_id),
            command_count: model.command_count,
            speaker_id: model.speaker_id,
            likeability: model.likeability,
        }
    }
}
