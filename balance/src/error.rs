//! Balance-specific errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BalanceError {
    #[error("birthdate {birthdate} is after today ({today})")]
    BirthdateInFuture { birthdate: String, today: String },

    #[error("{0}")]
    Other(String),
}
