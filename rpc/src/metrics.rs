//! Prometheus metrics for the API server.
//!
//! [`RpcMetrics`] owns a dedicated [`Registry`] that the `/metrics` endpoint
//! encodes into the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, Encoder, Histogram, HistogramOpts, IntCounter,
    IntCounterVec, Opts, Registry, TextEncoder,
};

use birthright_verification::ProxyError;

pub struct RpcMetrics {
    pub registry: Registry,

    /// Verification requests by outcome.
    pub verifications: IntCounterVec,
    /// Allocation previews served.
    pub allocation_requests: IntCounter,
    /// Round trip to the upstream verifier, in milliseconds.
    pub verify_latency_ms: Histogram,
}

impl RpcMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let verifications = register_int_counter_vec_with_registry!(
            Opts::new(
                "birthright_verifications_total",
                "Proof verification requests by outcome"
            ),
            &["outcome"],
            registry
        )
        .expect("failed to register verifications counter");

        let allocation_requests = register_int_counter_with_registry!(
            Opts::new(
                "birthright_allocation_requests_total",
                "Allocation previews computed"
            ),
            registry
        )
        .expect("failed to register allocation_requests counter");

        // 5 ms → ~20 s.
        let verify_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "birthright_verify_latency_ms",
                "Verification request latency in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(5.0, 2.0, 13).unwrap()),
            registry
        )
        .expect("failed to register verify_latency_ms histogram");

        Self {
            registry,
            verifications,
            allocation_requests,
            verify_latency_ms,
        }
    }

    /// Count one verification outcome.
    pub fn record_verification(&self, outcome: Result<(), &ProxyError>) {
        self.verifications
            .with_label_values(&[outcome_label(outcome)])
            .inc();
    }

    /// Encode every registered metric in the text exposition format.
    pub fn encode(&self) -> String {
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            tracing::warn!("failed to encode metrics: {e}");
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Default for RpcMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn outcome_label(outcome: Result<(), &ProxyError>) -> &'static str {
    match outcome {
        Ok(()) => "verified",
        Err(ProxyError::MissingFields(_)) => "missing_fields",
        Err(ProxyError::Configuration(_)) => "configuration",
        Err(ProxyError::UpstreamRejected { .. }) => "rejected",
        Err(ProxyError::DuplicateNullifier(_)) => "duplicate",
        Err(ProxyError::Internal(_)) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_are_labelled() {
        let metrics = RpcMetrics::new();
        metrics.record_verification(Ok(()));
        metrics.record_verification(Err(&ProxyError::DuplicateNullifier("0x1".into())));
        metrics.allocation_requests.inc();

        let text = metrics.encode();
        assert!(text.contains("birthright_verifications_total{outcome=\"verified\"} 1"));
        assert!(text.contains("birthright_verifications_total{outcome=\"duplicate\"} 1"));
        assert!(text.contains("birthright_allocation_requests_total 1"));
    }
}
