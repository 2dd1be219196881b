//! World ID humanity proofs and the normalized result of verifying one.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::BirthrightError;

/// Assurance tier of a proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationLevel {
    /// Biometric verification at an Orb.
    Orb,
    /// Device-bound credential.
    Device,
}

impl VerificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orb => "orb",
            Self::Device => "device",
        }
    }
}

impl fmt::Display for VerificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationLevel {
    type Err = BirthrightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "orb" => Ok(Self::Orb),
            "device" => Ok(Self::Device),
            other => Err(BirthrightError::InvalidVerificationLevel(other.to_string())),
        }
    }
}

/// A zero-knowledge proof bundle as produced by the client-side widget.
///
/// Every field may arrive absent, `null` or empty; [`Proof::missing_fields`]
/// reports which of the required ones are unusable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub merkle_root: String,
    /// Unique per verified user and action.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nullifier_hash: String,
    /// Opaque proof blob.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub proof: String,
    #[serde(default)]
    pub verification_level: Option<VerificationLevel>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Proof {
    pub fn new(
        merkle_root: impl Into<String>,
        nullifier_hash: impl Into<String>,
        proof: impl Into<String>,
        verification_level: VerificationLevel,
    ) -> Self {
        Self {
            merkle_root: merkle_root.into(),
            nullifier_hash: nullifier_hash.into(),
            proof: proof.into(),
            verification_level: Some(verification_level),
        }
    }

    /// Names of the required fields that are empty. Whitespace is content and
    /// is left for the verifier to judge.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.merkle_root.is_empty() {
            missing.push("merkle_root");
        }
        if self.nullifier_hash.is_empty() {
            missing.push("nullifier_hash");
        }
        if self.proof.is_empty() {
            missing.push("proof");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Outcome of a single verification request. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationResult {
    Verified {
        nullifier_hash: String,
        verification_level: Option<VerificationLevel>,
    },
    Failed {
        error_code: String,
        detail: Option<String>,
    },
}

impl VerificationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }

    pub fn nullifier_hash(&self) -> Option<&str> {
        match self {
            Self::Verified { nullifier_hash, .. } => Some(nullifier_hash),
            Self::Failed { .. } => None,
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Verified { .. } => None,
            Self::Failed { error_code, .. } => Some(error_code),
        }
    }
}
