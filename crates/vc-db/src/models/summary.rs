//! Voice summary query models

use sqlx::FromRow;

/// Connection/mic totals, either one vc_summary row or a SUM over several
#[derive(Debug, Clone, FromRow)]
pub struct SummaryTotalsModel {
    pub total_connection_time: i64,
    pub total_mic_on_time: i64,
}

/// One user's totals grouped over a ranking scope
#[derive(Debug, Clone, FromRow)]
pub struct RankingRowModel {
    pub user_id: i64,
    pub total_connection_time: i64,
    pub total_mic_on_time: i64,
}

/// One user's position within a ranking scope
#[derive(Debug, Clone, FromRow)]
pub struct UserRankModel {
    pub rank: i64,
    pub total_connection_time: i64,
    pub total_mic_on_time: i64,
}
