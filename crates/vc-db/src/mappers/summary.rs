//! Summary query models -> entity mappers

use vc_core::entities::{RankingRow, SummaryTotals, UserRank};
use vc_core::value_objects::Snowflake;

use crate::models::{RankingRowModel, SummaryTotalsModel, UserRankModel};

impl From<SummaryTotalsModel> for SummaryTotals {
    fn from(model: SummaryTotalsModel) -> Self {
        SummaryTotals::new(model.total_connection_time, model.total_mic_on_time)
    }
}

impl From<RankingRowModel> for RankingRow {
    fn from(model: RankingRowModel) -> Self {
        RankingRow {
            user_id: Snowflake::new(model.user_id),
            totals: SummaryTotals::new(model.total_connection_time, model.total_mic_on_time),
        }
    }
}

impl From<UserRankModel> for UserRank {
    fn from(model: UserRankModel) -> Self {
        UserRank {
            rank: model.rank,
            totals: SummaryTotals::new(model.total_connection_time, model.total_mic_on_time),
        }
    }
}
