//! HTTP client for the World ID cloud verifier.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::upstream::{UpstreamBody, UpstreamReply, UpstreamRequest, VerificationBackend};

/// Default timeout for verification requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends `POST {verify_url}/{app_id}` and parses the JSON reply.
pub struct WorldIdClient {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    verify_url: String,
}

impl WorldIdClient {
    pub fn new(verify_url: impl Into<String>) -> Self {
        Self::with_timeout(verify_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(verify_url: impl Into<String>, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            verify_url: verify_url.into(),
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::with_timeout(&config.verify_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn endpoint_for(&self, app_id: &str) -> String {
        format!("{}/{}", self.verify_url.trim_end_matches('/'), app_id)
    }
}

#[async_trait]
impl VerificationBackend for WorldIdClient {
    async fn verify(
        &self,
        app_id: &str,
        request: &UpstreamRequest,
    ) -> Result<UpstreamReply, ProxyError> {
        let url = self.endpoint_for(app_id);

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProxyError::Internal(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    ProxyError::Internal(format!("connection failed: {e}"))
                } else {
                    ProxyError::Internal(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body: UpstreamBody = response.json().await.map_err(|e| {
            ProxyError::Internal(format!("failed to parse verification response: {e}"))
        })?;

        tracing::debug!(%url, status, success = body.success, "verifier replied");
        Ok(UpstreamReply::new(status, body))
    }
}
