use birthright_balance::BalanceError;
use birthright_types::GovernmentLevel;
use thiserror::Error;

use crate::session::Screen;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("weight for {level} must be within [0, 10000] basis points, got {bps}")]
    InvalidWeight { level: GovernmentLevel, bps: u32 },

    #[error("weight ratio for {level} must be within [0, 1], got {ratio}")]
    InvalidRatio { level: GovernmentLevel, ratio: String },

    #[error("level weights sum to {total_bps} basis points, more than 10000")]
    WeightsExceedTotal { total_bps: u32 },

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} from the {from:?} screen")]
    InvalidTransition { from: Screen, action: &'static str },

    #[error("humanity verification failed: {0}")]
    VerificationFailed(String),

    #[error("no birthdate has been entered")]
    MissingBirthdate,

    #[error("balance error: {0}")]
    Balance(#[from] BalanceError),
}
