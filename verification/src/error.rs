use birthright_types::VerificationResult;
use thiserror::Error;

/// Upstream fallbacks when the verifier omits code or detail.
pub const GENERIC_FAILURE_CODE: &str = "verification_failed";
pub const GENERIC_FAILURE_DETAIL: &str = "Verification failed";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProxyError {
    #[error("missing required proof fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("verifier configuration error: {0}")]
    Configuration(String),

    #[error("verification rejected upstream: {code} ({detail})")]
    UpstreamRejected { code: String, detail: String },

    #[error("nullifier {0} has already been used")]
    DuplicateNullifier(String),

    #[error("internal verification error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Caller-facing error string. Configuration and internal details stay server-side.
    pub fn error_code(&self) -> String {
        match self {
            Self::MissingFields(_) => "Missing required proof fields".to_string(),
            Self::Configuration(_) => "Server configuration error".to_string(),
            Self::UpstreamRejected { code, .. } => code.clone(),
            Self::DuplicateNullifier(_) => "duplicate_nullifier".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Caller-facing detail, when there is one safe to share.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::UpstreamRejected { detail, .. } => Some(detail.clone()),
            Self::DuplicateNullifier(_) => {
                Some("This credential has already been used for this action".to_string())
            }
            _ => None,
        }
    }

    /// Whether the caller, rather than the server, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFields(_) | Self::UpstreamRejected { .. } | Self::DuplicateNullifier(_)
        )
    }
}

impl From<ProxyError> for VerificationResult {
    fn from(e: ProxyError) -> Self {
        VerificationResult::Failed {
            error_code: e.error_code(),
            detail: e.detail(),
        }
    }
}
