//! Membership model -> entity mapper

use vc_core::entities::Membership;
use vc_core::value_objects::{MembershipId, Snowflake};

use crate::models::MembershipModel;

impl From<MembershipModel> for Membership {
    fn from(model: MembershipModel) -> Self {
        Membership {
            id: MembershipId::new(model.id),
            guild_id: Snowflake::new(model.guild_id),
            user_id: Snowflake::new(model.user_id),
            join_date: model.join_date,
        }
    }
}
