//! Nullable verifier with scripted replies and recorded requests.

use async_trait::async_trait;
use birthright_verification::{
    ProxyError, UpstreamBody, UpstreamReply, UpstreamRequest, VerificationBackend,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A verifier that answers from a script instead of the network.
///
/// Queued replies are consumed in order; once the queue is empty every call
/// gets the default reply. Every request is recorded with its app id.
pub struct NullVerificationBackend {
    queued: Mutex<VecDeque<Result<UpstreamReply, ProxyError>>>,
    default_reply: Result<UpstreamReply, ProxyError>,
    calls: Mutex<Vec<(String, UpstreamRequest)>>,
}

impl NullVerificationBackend {
    /// Accepts every proof.
    pub fn accepting() -> Self {
        Self::with_default(Ok(UpstreamReply::new(
            200,
            UpstreamBody {
                success: true,
                code: None,
                detail: None,
            },
        )))
    }

    /// Rejects every proof with `status` and the given code/detail.
    pub fn rejecting(status: u16, code: Option<&str>, detail: Option<&str>) -> Self {
        Self::with_default(Ok(UpstreamReply::new(
            status,
            UpstreamBody {
                success: false,
                code: code.map(str::to_string),
                detail: detail.map(str::to_string),
            },
        )))
    }

    /// Fails every call as a transport error.
    pub fn unreachable() -> Self {
        Self::with_default(Err(ProxyError::Internal("connection refused".into())))
    }

    pub fn with_default(default_reply: Result<UpstreamReply, ProxyError>) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            default_reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a one-off reply ahead of the default.
    pub fn enqueue(&self, reply: Result<UpstreamReply, ProxyError>) {
        self.queued.lock().unwrap().push_back(reply);
    }

    /// All requests received so far (for assertions).
    pub fn calls(&self) -> Vec<(String, UpstreamRequest)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for NullVerificationBackend {
    fn default() -> Self {
        Self::accepting()
    }
}

#[async_trait]
impl VerificationBackend for NullVerificationBackend {
    async fn verify(
        &self,
        app_id: &str,
        request: &UpstreamRequest,
    ) -> Result<UpstreamReply, ProxyError> {
        self.calls
            .lock()
            .unwrap()
            .push((app_id.to_string(), request.clone()));
        self.queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone())
    }
}
