//! Wire types and the backend seam for the upstream verifier.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProxyError;

/// Body POSTed to the verifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamRequest {
    pub merkle_root: String,
    pub nullifier_hash: String,
    pub proof: String,
    pub action: String,
    /// Empty when the caller supplied none.
    pub signal: String,
}

/// The fields of the verifier's JSON reply this service reads.
///
/// Any JSON document parses. `success` holds only for a literal `true`, and
/// `code`/`detail` keep only non-empty strings, so a malformed reply reads as
/// a plain rejection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct UpstreamBody {
    pub success: bool,
    pub code: Option<String>,
    pub detail: Option<String>,
}

impl From<Value> for UpstreamBody {
    fn from(value: Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            success: value.get("success").and_then(Value::as_bool) == Some(true),
            code: text("code"),
            detail: text("detail"),
        }
    }
}

/// HTTP status plus parsed body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: UpstreamBody,
}

impl UpstreamReply {
    pub fn new(status: u16, body: UpstreamBody) -> Self {
        Self { status, body }
    }

    /// A 2xx status and an explicit `success: true`.
    pub fn is_verified(&self) -> bool {
        (200..300).contains(&self.status) && self.body.success
    }
}

/// Something that can check a proof: the World ID cloud in production,
/// a scripted double in tests.
#[async_trait]
pub trait VerificationBackend: Send + Sync {
    /// Issue exactly one verification request.
    ///
    /// Transport and parse failures are [`ProxyError::Internal`]; any parsed
    /// reply, success or not, is `Ok`.
    async fn verify(
        &self,
        app_id: &str,
        request: &UpstreamRequest,
    ) -> Result<UpstreamReply, ProxyError>;
}
