//! Time balance: one TIME per day lived.
//!
//! Balances are whole days stored as `u64`. They are derived once from a
//! birthdate and never mutated within a session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A time balance in whole days.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeBalance(u64);

impl TimeBalance {
    pub const ZERO: Self = Self(0);

    pub fn new(days: u64) -> Self {
        Self(days)
    }

    pub fn days(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for TimeBalance {
    fn from(days: u64) -> Self {
        Self(days)
    }
}

impl fmt::Display for TimeBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} TIME", self.0)
    }
}
