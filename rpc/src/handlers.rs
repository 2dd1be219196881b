//! HTTP request handlers.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use birthright_governance::{compute_allocations, LawCounts};
use birthright_types::{Birthdate, GovernmentLevel, Official, Proof, TimeBalance, VerificationLevel};
use birthright_verification::ProxyError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::error::RpcError;
use crate::state::AppState;

pub const VERIFIED_MESSAGE: &str = "Human verified successfully";

// ── Verify ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(flatten)]
    pub proof: Proof,
    /// Defaults to the empty string upstream.
    #[serde(default)]
    pub signal: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub nullifier_hash: String,
    pub verification_level: Option<VerificationLevel>,
    pub message: String,
}

/// `POST /api/verify`
///
/// The body is parsed by hand so an unreadable payload surfaces as an
/// internal error rather than axum's own rejection.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<VerifyResponse>, RpcError> {
    let request: VerifyRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!("unreadable verification request: {e}");
        let err = ProxyError::Internal(e.to_string());
        if let Some(metrics) = &state.metrics {
            metrics.record_verification(Err(&err));
        }
        err
    })?;

    let started = Instant::now();
    let outcome = state
        .proxy
        .verify(&request.proof, request.signal.as_deref())
        .await;

    if let Some(metrics) = &state.metrics {
        metrics
            .verify_latency_ms
            .observe(started.elapsed().as_secs_f64() * 1000.0);
        metrics.record_verification(outcome.as_ref().map(|_| ()));
    }

    let confirmed = outcome?;
    Ok(Json(VerifyResponse {
        success: true,
        nullifier_hash: confirmed.nullifier_hash,
        verification_level: confirmed.verification_level,
        message: VERIFIED_MESSAGE.to_string(),
    }))
}

// ── Governance ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct LevelRoster {
    pub level: GovernmentLevel,
    pub weight_bps: u32,
    pub officials: Vec<Official>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GovernanceResponse {
    pub location: String,
    pub levels: Vec<LevelRoster>,
    pub laws: LawCounts,
    pub total_officials: usize,
    pub total_laws: u64,
}

/// `GET /api/governance`
pub async fn governance(State(state): State<Arc<AppState>>) -> Json<GovernanceResponse> {
    let profile = state.allocator.profile();
    let weights = state.allocator.weights();

    let levels = profile
        .officials_by_level()
        .into_iter()
        .map(|(level, officials)| LevelRoster {
            level,
            weight_bps: weights.weight_bps(level),
            officials: officials.into_iter().cloned().collect(),
        })
        .collect();

    Json(GovernanceResponse {
        total_officials: profile.total_officials(),
        total_laws: profile.total_laws(),
        location: profile.location,
        levels,
        laws: profile.laws,
    })
}

// ── Allocations ──────────────────────────────────────────────────────────

/// Exactly one of the two fields must be set.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AllocationRequest {
    #[serde(default)]
    pub birthdate: Option<Birthdate>,
    #[serde(default)]
    pub balance: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OfficialAllocation {
    pub id: String,
    pub name: String,
    pub title: String,
    pub level: GovernmentLevel,
    pub days: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LevelAllocation {
    pub level: GovernmentLevel,
    pub officials: usize,
    pub weight_bps: u32,
    pub days: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AllocationResponse {
    pub time_balance: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    pub allocations: Vec<OfficialAllocation>,
    pub levels: Vec<LevelAllocation>,
    pub allocated: u64,
    pub unallocated: u64,
}

/// `POST /api/allocations`
pub async fn allocations(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AllocationResponse>, RpcError> {
    let request: AllocationRequest = serde_json::from_slice(&body)
        .map_err(|e| RpcError::InvalidRequest(format!("invalid request body: {e}")))?;

    let (balance, age) = match (request.birthdate, request.balance) {
        (Some(birthdate), None) => (
            state.engine.claim(birthdate)?,
            Some(state.engine.age(birthdate)),
        ),
        (None, Some(days)) => (TimeBalance::new(days), None),
        _ => {
            return Err(RpcError::InvalidRequest(
                "exactly one of birthdate or balance is required".into(),
            ))
        }
    };

    let profile = state.allocator.profile();
    let weights = state.allocator.weights();
    let table = compute_allocations(balance, &profile.officials, weights);

    let allocations = profile
        .officials
        .iter()
        .map(|o| OfficialAllocation {
            id: o.id.clone(),
            name: o.name.clone(),
            title: o.title.clone(),
            level: o.level,
            days: table.share(&o.id),
        })
        .collect();

    let levels = GovernmentLevel::ALL
        .iter()
        .map(|&level| LevelAllocation {
            level,
            officials: profile.officials_at(level).count(),
            weight_bps: weights.weight_bps(level),
            days: table.level_allocation(level),
        })
        .collect();

    if let Some(metrics) = &state.metrics {
        metrics.allocation_requests.inc();
    }
    tracing::debug!(%balance, allocated = table.total(), "served allocation preview");

    Ok(Json(AllocationResponse {
        time_balance: balance.days(),
        age,
        allocations,
        levels,
        allocated: table.total(),
        unallocated: table.unallocated(),
    }))
}

// ── Operations ───────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /metrics`
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(metrics) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            metrics.encode(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
