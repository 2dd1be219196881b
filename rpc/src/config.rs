//! Server configuration with TOML file support.

use birthright_governance::{LevelWeights, VerificationPolicy};
use birthright_utils::LogFormat;
use birthright_verification::ProxyConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::RpcError;

/// Configuration for the Birthright API server.
///
/// Can be loaded from a TOML file via [`ServerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so an
/// empty file is valid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind the HTTP listener to.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to expose Prometheus metrics on `/metrics`.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Origins allowed by CORS. Empty allows any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// What a failed verification does to a command-line claim.
    #[serde(default)]
    pub verification_policy: VerificationPolicy,

    /// World ID verifier settings.
    #[serde(default)]
    pub world_id: ProxyConfig,

    /// Allocation weight per government level, in basis points.
    #[serde(default)]
    pub weights: LevelWeights,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServerConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, RpcError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RpcError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, RpcError> {
        let config: Self = toml::from_str(s).map_err(|e| RpcError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, RpcError> {
        toml::to_string_pretty(self).map_err(|e| RpcError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), RpcError> {
        self.weights
            .validate()
            .map_err(|e| RpcError::Config(e.to_string()))
    }

    /// `bind:port`, as handed to the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            enable_metrics: false,
            allowed_origins: Vec::new(),
            verification_policy: VerificationPolicy::default(),
            world_id: ProxyConfig::default(),
            weights: LevelWeights::default(),
        }
    }
}
