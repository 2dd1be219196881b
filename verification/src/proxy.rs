//! The verification proxy.
//!
//! Order of checks for every call:
//! 1. required proof fields present, else `MissingFields` (no network)
//! 2. app id and action configured, else `Configuration` (no network)
//! 3. nullifier unseen, when duplicate rejection is on (no network)
//! 4. one upstream request; success needs a 2xx status and `success: true`

use birthright_types::{Proof, VerificationLevel, VerificationResult};
use std::sync::Arc;

use crate::client::WorldIdClient;
use crate::config::ProxyConfig;
use crate::error::{ProxyError, GENERIC_FAILURE_CODE, GENERIC_FAILURE_DETAIL};
use crate::nullifier::{InMemoryNullifierRegistry, NullifierRegistry};
use crate::upstream::{UpstreamRequest, VerificationBackend};

/// A proof the upstream verifier accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmedProof {
    pub nullifier_hash: String,
    pub verification_level: Option<VerificationLevel>,
}

impl From<ConfirmedProof> for VerificationResult {
    fn from(confirmed: ConfirmedProof) -> Self {
        VerificationResult::Verified {
            nullifier_hash: confirmed.nullifier_hash,
            verification_level: confirmed.verification_level,
        }
    }
}

pub struct VerifyProxy {
    config: ProxyConfig,
    backend: Arc<dyn VerificationBackend>,
    registry: Option<Arc<dyn NullifierRegistry>>,
}

impl VerifyProxy {
    /// A proxy over `backend`. Duplicate rejection, when configured, uses a
    /// fresh in-memory registry.
    pub fn new(config: ProxyConfig, backend: Arc<dyn VerificationBackend>) -> Self {
        let registry: Option<Arc<dyn NullifierRegistry>> = if config.reject_duplicate_nullifiers {
            Some(Arc::new(InMemoryNullifierRegistry::new()))
        } else {
            None
        };
        Self {
            config,
            backend,
            registry,
        }
    }

    /// A proxy talking to the World ID cloud verifier.
    pub fn world_id(config: ProxyConfig) -> Self {
        let client = WorldIdClient::from_config(&config);
        Self::new(config, Arc::new(client))
    }

    /// Replace the nullifier registry; enables duplicate rejection.
    pub fn with_registry(mut self, registry: Arc<dyn NullifierRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Verify `proof` upstream. `signal` defaults to the empty string.
    pub async fn verify(
        &self,
        proof: &Proof,
        signal: Option<&str>,
    ) -> Result<ConfirmedProof, ProxyError> {
        let missing = proof.missing_fields();
        if !missing.is_empty() {
            tracing::debug!(?missing, "rejecting incomplete proof");
            return Err(ProxyError::MissingFields(missing));
        }

        let (app_id, action) = self.config.credentials().map_err(|e| {
            tracing::error!("World ID configuration missing: {e}");
            e
        })?;

        if let Some(registry) = &self.registry {
            if registry.contains(&proof.nullifier_hash) {
                tracing::warn!(nullifier_hash = %proof.nullifier_hash, "duplicate nullifier");
                return Err(ProxyError::DuplicateNullifier(proof.nullifier_hash.clone()));
            }
        }

        let request = UpstreamRequest {
            merkle_root: proof.merkle_root.clone(),
            nullifier_hash: proof.nullifier_hash.clone(),
            proof: proof.proof.clone(),
            action: action.to_string(),
            signal: signal.unwrap_or_default().to_string(),
        };

        let reply = self.backend.verify(app_id, &request).await.map_err(|e| {
            tracing::error!("verification error: {e}");
            e
        })?;

        if !reply.is_verified() {
            tracing::warn!(
                status = reply.status,
                code = ?reply.body.code,
                detail = ?reply.body.detail,
                "World ID verification failed"
            );
            return Err(ProxyError::UpstreamRejected {
                code: reply
                    .body
                    .code
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE_CODE.to_string()),
                detail: reply
                    .body
                    .detail
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE_DETAIL.to_string()),
            });
        }

        if let Some(registry) = &self.registry {
            if !registry.record(&proof.nullifier_hash) {
                // A concurrent request with the same nullifier won the race.
                return Err(ProxyError::DuplicateNullifier(proof.nullifier_hash.clone()));
            }
        }

        tracing::info!(
            nullifier_hash = %proof.nullifier_hash,
            verification_level = ?proof.verification_level,
            action,
            "World ID verification successful"
        );

        Ok(ConfirmedProof {
            nullifier_hash: proof.nullifier_hash.clone(),
            verification_level: proof.verification_level,
        })
    }

    /// [`Self::verify`], folded into a [`VerificationResult`].
    pub async fn verify_result(&self, proof: &Proof, signal: Option<&str>) -> VerificationResult {
        match self.verify(proof, signal).await {
            Ok(confirmed) => confirmed.into(),
            Err(e) => e.into(),
        }
    }
}
