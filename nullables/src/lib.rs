//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies (the calendar, the World ID verifier) sit behind
//! traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod verifier;

pub use clock::NullClock;
pub use verifier::NullVerificationBackend;
