//! Shared handler state.

use birthright_balance::{BalanceEngine, Clock, SystemClock};
use birthright_governance::{Allocator, StaticRoster};
use birthright_verification::VerifyProxy;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::metrics::RpcMetrics;

/// Everything a request handler needs. Built once, shared behind an `Arc`.
pub struct AppState {
    pub proxy: VerifyProxy,
    pub allocator: Allocator,
    pub engine: BalanceEngine<Arc<dyn Clock>>,
    pub metrics: Option<RpcMetrics>,
}

impl AppState {
    pub fn new(
        proxy: VerifyProxy,
        allocator: Allocator,
        clock: Arc<dyn Clock>,
        metrics: Option<RpcMetrics>,
    ) -> Self {
        Self {
            proxy,
            allocator,
            engine: BalanceEngine::with_clock(clock),
            metrics,
        }
    }

    /// Production wiring: World ID verifier, bundled roster, wall clock.
    pub fn from_config(config: &ServerConfig) -> Self {
        let allocator = Allocator::new(
            Arc::new(StaticRoster::san_francisco()),
            config.weights.clone(),
        );
        let metrics = config.enable_metrics.then(RpcMetrics::new);
        Self::new(
            VerifyProxy::world_id(config.world_id.clone()),
            allocator,
            Arc::new(SystemClock),
            metrics,
        )
    }
}
