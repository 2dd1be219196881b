//! HTTP API for Birthright.
//!
//! Provides endpoints for:
//! - Proof verification against World ID (`POST /api/verify`)
//! - The governance roster and law counts (`GET /api/governance`)
//! - Allocation previews for a birthdate or balance (`POST /api/allocations`)
//! - Liveness and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::RpcError;
pub use metrics::RpcMetrics;
pub use server::{shutdown_signal, RpcServer};
pub use state::AppState;
