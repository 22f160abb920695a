//! Membership ID - surrogate key of a (guild, user) pairing

use serde::{Deserialize, Serialize};
use std::fmt;

/// Surrogate key assigned by storage when a membership is first seen.
/// Every session and summary row joins on this instead of (guild, user).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipId(i64);

impl MembershipId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MembershipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MembershipId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
