//! Fundamental types for the Birthright service.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! humanity proofs and their verification results, officials and government
//! levels, time balances and birthdates.

pub mod balance;
pub mod date;
pub mod error;
pub mod official;
pub mod proof;

pub use balance::TimeBalance;
pub use date::Birthdate;
pub use error::BirthrightError;
pub use official::{GovernmentLevel, Official};
pub use proof::{Proof, VerificationLevel, VerificationResult};
