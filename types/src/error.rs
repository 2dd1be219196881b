//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for parsing and validating Birthright values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BirthrightError {
    #[error("unknown government level: {0}")]
    InvalidLevel(String),

    #[error("unknown verification level: {0}")]
    InvalidVerificationLevel(String),

    #[error("invalid birthdate {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("{0}")]
    Other(String),
}
