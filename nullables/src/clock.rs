//! Nullable clock: a calendar that only moves when told to.

use birthright_balance::Clock;
use chrono::{Days, NaiveDate};
use std::sync::Mutex;

pub struct NullClock {
    today: Mutex<NaiveDate>,
}

impl NullClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    /// Clock pinned to `year-month-day`.
    ///
    /// # Panics
    /// Panics if the date does not exist.
    pub fn at(year: i32, month: u32, day: u32) -> Self {
        Self::new(NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date"))
    }

    /// Advance the calendar by `days`.
    pub fn advance_days(&self, days: u64) {
        let mut today = self.today.lock().unwrap();
        *today = *today + Days::new(days);
    }

    pub fn set(&self, date: NaiveDate) {
        *self.today.lock().unwrap() = date;
    }
}

impl Clock for NullClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap()
    }
}
