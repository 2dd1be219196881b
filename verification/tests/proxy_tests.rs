//! Verification proxy behaviour against a scripted upstream.

use std::sync::Arc;

use birthright_nullables::NullVerificationBackend;
use birthright_types::{Proof, VerificationLevel, VerificationResult};
use birthright_verification::{
    InMemoryNullifierRegistry, NullifierRegistry, ProxyConfig, ProxyError, UpstreamBody,
    UpstreamReply, VerifyProxy,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config() -> ProxyConfig {
    ProxyConfig::new("app_staging_test", "claim_time_birthright")
}

fn proof() -> Proof {
    Proof::new("0xroot", "0xnullifier", "0xproof", VerificationLevel::Orb)
}

fn proxy_with(backend: &Arc<NullVerificationBackend>, config: ProxyConfig) -> VerifyProxy {
    VerifyProxy::new(config, backend.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn accepted_proof_is_confirmed() {
    let backend = Arc::new(NullVerificationBackend::accepting());
    let proxy = proxy_with(&backend, config());

    let confirmed = proxy.verify(&proof(), None).await.unwrap();

    assert_eq!(confirmed.nullifier_hash, "0xnullifier");
    assert_eq!(confirmed.verification_level, Some(VerificationLevel::Orb));
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn outbound_request_carries_action_and_empty_signal() {
    let backend = Arc::new(NullVerificationBackend::accepting());
    let proxy = proxy_with(&backend, config());

    proxy.verify(&proof(), None).await.unwrap();
    proxy.verify(&proof(), Some("0xwallet")).await.unwrap();

    let calls = backend.calls();
    let (app_id, first) = &calls[0];
    assert_eq!(app_id, "app_staging_test");
    assert_eq!(first.action, "claim_time_birthright");
    assert_eq!(first.merkle_root, "0xroot");
    assert_eq!(first.proof, "0xproof");
    assert_eq!(first.signal, "");
    assert_eq!(calls[1].1.signal, "0xwallet");
}

#[tokio::test]
async fn missing_fields_never_reach_upstream() {
    let backend = Arc::new(NullVerificationBackend::accepting());
    let proxy = proxy_with(&backend, config());

    for field in ["merkle_root", "nullifier_hash", "proof"] {
        let mut incomplete = proof();
        match field {
            "merkle_root" => incomplete.merkle_root.clear(),
            "nullifier_hash" => incomplete.nullifier_hash.clear(),
            _ => incomplete.proof.clear(),
        }
        let err = proxy.verify(&incomplete, None).await.unwrap_err();
        assert_eq!(err, ProxyError::MissingFields(vec![field]));
    }

    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn missing_fields_checked_before_configuration() {
    let backend = Arc::new(NullVerificationBackend::accepting());
    let proxy = proxy_with(&backend, ProxyConfig::default());

    let err = proxy.verify(&Proof::default(), None).await.unwrap_err();
    assert!(matches!(err, ProxyError::MissingFields(_)));
}

#[tokio::test]
async fn unconfigured_proxy_is_configuration_error() {
    let backend = Arc::new(NullVerificationBackend::accepting());
    let proxy = proxy_with(&backend, ProxyConfig::default());

    let err = proxy.verify(&proof(), None).await.unwrap_err();

    assert!(matches!(err, ProxyError::Configuration(_)));
    assert_eq!(err.error_code(), "Server configuration error");
    assert_eq!(err.detail(), None);
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn upstream_rejection_passes_code_through() {
    let backend = Arc::new(NullVerificationBackend::rejecting(
        200,
        Some("invalid_proof"),
        Some("The provided proof is invalid."),
    ));
    let proxy = proxy_with(&backend, config());

    let err = proxy.verify(&proof(), None).await.unwrap_err();

    assert_eq!(
        err,
        ProxyError::UpstreamRejected {
            code: "invalid_proof".into(),
            detail: "The provided proof is invalid.".into(),
        }
    );
    assert!(err.is_client_error());
}

#[tokio::test]
async fn rejection_without_code_is_generic() {
    let backend = Arc::new(NullVerificationBackend::rejecting(400, None, None));
    let proxy = proxy_with(&backend, config());

    let result = proxy.verify_result(&proof(), None).await;

    assert_eq!(
        result,
        VerificationResult::Failed {
            error_code: "verification_failed".into(),
            detail: Some("Verification failed".into()),
        }
    );
}

#[tokio::test]
async fn empty_rejection_code_falls_back_to_generic() {
    let backend = Arc::new(NullVerificationBackend::rejecting(200, Some(""), Some("")));
    let proxy = proxy_with(&backend, config());

    let err = proxy.verify(&proof(), None).await.unwrap_err();

    assert_eq!(
        err,
        ProxyError::UpstreamRejected {
            code: "verification_failed".into(),
            detail: "Verification failed".into(),
        }
    );
    assert!(err.is_client_error());
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn success_flag_with_error_status_is_rejected() {
    let backend = Arc::new(NullVerificationBackend::with_default(Ok(UpstreamReply::new(
        500,
        UpstreamBody {
            success: true,
            code: None,
            detail: None,
        },
    ))));
    let proxy = proxy_with(&backend, config());

    assert!(matches!(
        proxy.verify(&proof(), None).await,
        Err(ProxyError::UpstreamRejected { .. })
    ));
}

#[tokio::test]
async fn transport_failure_is_internal_and_not_retried() {
    let backend = Arc::new(NullVerificationBackend::unreachable());
    let proxy = proxy_with(&backend, config());

    let err = proxy.verify(&proof(), None).await.unwrap_err();

    assert!(matches!(err, ProxyError::Internal(_)));
    assert_eq!(err.error_code(), "Internal server error");
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn duplicates_allowed_by_default() {
    let backend = Arc::new(NullVerificationBackend::accepting());
    let proxy = proxy_with(&backend, config());

    proxy.verify(&proof(), None).await.unwrap();
    proxy.verify(&proof(), None).await.unwrap();

    assert_eq!(backend.call_count(), 2);
}

#[tokio::test]
async fn duplicate_nullifier_rejected_when_enabled() {
    let backend = Arc::new(NullVerificationBackend::accepting());
    let mut cfg = config();
    cfg.reject_duplicate_nullifiers = true;
    let proxy = proxy_with(&backend, cfg);

    proxy.verify(&proof(), None).await.unwrap();
    let err = proxy.verify(&proof(), None).await.unwrap_err();

    assert_eq!(err, ProxyError::DuplicateNullifier("0xnullifier".into()));
    assert_eq!(err.error_code(), "duplicate_nullifier");
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn rejected_proof_does_not_burn_nullifier() {
    let backend = Arc::new(NullVerificationBackend::accepting());
    backend.enqueue(Ok(UpstreamReply::new(
        400,
        UpstreamBody {
            success: false,
            code: Some("invalid_proof".into()),
            detail: None,
        },
    )));
    let registry = Arc::new(InMemoryNullifierRegistry::new());
    let proxy = proxy_with(&backend, config()).with_registry(registry.clone());

    assert!(proxy.verify(&proof(), None).await.is_err());
    assert!(!registry.contains("0xnullifier"));
    assert!(proxy.verify(&proof(), None).await.is_ok());
    assert!(registry.contains("0xnullifier"));
}
