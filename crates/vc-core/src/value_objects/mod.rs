//! Value objects - immutable types that represent domain concepts

mod duration;
mod membership_id;
mod period;
mod snowflake;

pub use duration::FormattedDuration;
pub use membership_id::MembershipId;
pub use period::Period;
pub use snowflake::{Snowflake, SnowflakeParseError};
