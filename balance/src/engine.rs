//! Core time-balance computation.

use birthright_types::{Birthdate, TimeBalance};
use chrono::{Datelike, NaiveDate};

use crate::clock::{Clock, SystemClock};
use crate::error::BalanceError;

/// Whole days between `birthdate` and `today`, regardless of direction.
pub fn days_lived(birthdate: Birthdate, today: NaiveDate) -> u64 {
    today
        .signed_duration_since(birthdate.date())
        .num_days()
        .unsigned_abs()
}

/// Age in completed years.
///
/// Plain year difference, minus one while today's month/day still precedes
/// the birth month/day.
pub fn age(birthdate: Birthdate, today: NaiveDate) -> i32 {
    let birth = birthdate.date();
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years
}

/// Computes balances relative to a [`Clock`].
pub struct BalanceEngine<C = SystemClock> {
    clock: C,
}

impl BalanceEngine<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl Default for BalanceEngine<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> BalanceEngine<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn days_lived(&self, birthdate: Birthdate) -> u64 {
        days_lived(birthdate, self.clock.today())
    }

    pub fn age(&self, birthdate: Birthdate) -> i32 {
        age(birthdate, self.clock.today())
    }

    /// The balance for `birthdate` as of today: one TIME per day lived.
    pub fn time_balance(&self, birthdate: Birthdate) -> TimeBalance {
        TimeBalance::new(self.days_lived(birthdate))
    }

    /// Like [`Self::time_balance`], but refuses birthdates after today.
    pub fn claim(&self, birthdate: Birthdate) -> Result<TimeBalance, BalanceError> {
        let today = self.clock.today();
        if birthdate.date() > today {
            return Err(BalanceError::BirthdateInFuture {
                birthdate: birthdate.to_string(),
                today: today.to_string(),
            });
        }
        let balance = TimeBalance::new(days_lived(birthdate, today));
        tracing::debug!(%birthdate, %balance, "computed birthright balance");
        Ok(balance)
    }
}
