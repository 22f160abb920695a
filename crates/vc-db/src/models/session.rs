//! Open voice session database model

use sqlx::FromRow;

/// Database model for vc_sessions table
#[derive(Debug, Clone, FromRow)]
pub struct SessionModel {
    pub id: i64,
    pub channel_id: i64,
    pub event_time: i64,
    pub mic_on: bool,
}
