//! Membership entity - a user's presence in a guild

use serde::Serialize;

use crate::value_objects::{MembershipId, Snowflake};

/// Guild membership (junction between User and Guild)
///
/// Exactly one exists per (guild, user); `id` is the surrogate key that
/// summaries and open sessions reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Membership {
    pub id: MembershipId,
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    /// Unix seconds at which the membership was first recorded
    pub join_date: Option<i64>,
}

impl Membership {
    /// Check whether this membership belongs to the given pair
    #[inline]
    pub fn is_for(&self, guild_id: Snowflake, user_id: Snowflake) -> bool {
        self.guild_id == guild_id && self.user_id == user_id
    }
}
