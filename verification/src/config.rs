//! Proxy configuration, built once at start-up and handed to [`crate::VerifyProxy`].

use serde::{Deserialize, Serialize};

use crate::error::ProxyError;

/// World ID cloud verification endpoint; the app id is appended as a path segment.
pub const DEFAULT_VERIFY_URL: &str = "https://developer.worldcoin.org/api/v1/verify";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// World ID application identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    /// World ID action identifier the proof was generated for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(default = "default_verify_url")]
    pub verify_url: String,

    /// Whole-request timeout for the upstream call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Refuse a nullifier already verified by this process.
    #[serde(default)]
    pub reject_duplicate_nullifiers: bool,
}

fn default_verify_url() -> String {
    DEFAULT_VERIFY_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ProxyConfig {
    pub fn new(app_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            action: Some(action.into()),
            ..Default::default()
        }
    }

    /// The `(app_id, action)` pair, or a configuration error naming what is missing.
    pub fn credentials(&self) -> Result<(&str, &str), ProxyError> {
        match (non_empty(&self.app_id), non_empty(&self.action)) {
            (Some(app_id), Some(action)) => Ok((app_id, action)),
            (None, Some(_)) => Err(ProxyError::Configuration("app_id is not set".into())),
            (Some(_), None) => Err(ProxyError::Configuration("action is not set".into())),
            (None, None) => Err(ProxyError::Configuration(
                "app_id and action are not set".into(),
            )),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_ok()
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            action: None,
            verify_url: default_verify_url(),
            timeout_secs: default_timeout_secs(),
            reject_duplicate_nullifiers: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_both_values() {
        assert!(ProxyConfig::new("app_123", "claim").credentials().is_ok());

        let mut config = ProxyConfig::new("app_123", "   ");
        assert_eq!(
            config.credentials(),
            Err(ProxyError::Configuration("action is not set".into()))
        );
        config.action = Some("claim".into());
        config.app_id = None;
        assert!(!config.is_configured());
        assert!(!ProxyConfig::default().is_configured());
    }
}
