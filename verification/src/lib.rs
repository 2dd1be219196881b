//! Unique humanity verification.
//!
//! Proofs are produced by the World ID widget on the client and checked by
//! the World ID cloud verifier; this crate never evaluates a proof itself.
//! It provides:
//! - [`VerifyProxy`]: validates an inbound proof, forwards it once upstream,
//!   and normalizes the answer into a [`birthright_types::VerificationResult`]
//! - [`WorldIdClient`]: the reqwest-backed [`VerificationBackend`]
//! - [`NullifierRegistry`]: optional duplicate-claim detection
//!
//! There is no retry: a failed upstream call is final for that request.

pub mod client;
pub mod config;
pub mod error;
pub mod nullifier;
pub mod proxy;
pub mod upstream;

pub use client::WorldIdClient;
pub use config::{ProxyConfig, DEFAULT_VERIFY_URL};
pub use error::ProxyError;
pub use nullifier::{InMemoryNullifierRegistry, NullifierRegistry};
pub use proxy::{ConfirmedProof, VerifyProxy};
pub use upstream::{UpstreamBody, UpstreamReply, UpstreamRequest, VerificationBackend};
