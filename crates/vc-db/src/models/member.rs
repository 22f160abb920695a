//! Guild membership database model

use sqlx::FromRow;

/// Database model for guild_users table
#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub id: i64,
    pub guild_id: i64,
    pub user_id: i64,
    pub join_date: Option<i64>,
}
