//! Time balance: the birthright computation.
//!
//! A time balance is a deterministic function of the calendar:
//! `TIME(user) = |today − birthdate|` in whole days, one TIME per day lived.
//!
//! This crate handles:
//! - Days-lived and age arithmetic over plain calendar dates
//! - The [`Clock`] seam so "today" can be pinned in tests
//! - Deriving a claimable [`birthright_types::TimeBalance`] for a birthdate

pub mod clock;
pub mod engine;
pub mod error;

pub use clock::{Clock, SystemClock};
pub use engine::{age, days_lived, BalanceEngine};
pub use error::BalanceError;
