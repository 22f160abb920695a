//! User database model

use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub user_id: i64,
    pub speaker_id: i32,
    pub command_count: i64,
    pub likeability: i32,
}
