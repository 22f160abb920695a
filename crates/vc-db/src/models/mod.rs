//! Database models - SQLx-compatible structs for PostgreSQL tables

mod guild;
mod member;
mod session;
mod summary;
mod user;

pub use guild::GuildModel;
pub use member::MembershipModel;
pub use session::SessionModel;
pub use summary::{RankingRowModel, SummaryTotalsModel, UserRankModel};
pub use user::UserModel;
