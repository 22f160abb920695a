//! Domain entities - core business objects

mod guild;
mod member;
mod session;
mod summary;
mod user;

pub use guild::Guild;
pub use member::Membership;
pub use session::{mic_on_from_self_mute, OpenSession};
pub use summary::{RankingRow, RankingScope, SummaryKey, SummaryTotals, UserRank};
pub use user::User;
