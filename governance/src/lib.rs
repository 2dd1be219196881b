//! Governance allocation for a time balance.
//!
//! A verified human's time balance (one TIME per day lived) is spread across
//! the officials that govern them:
//!
//! `share(o) = floor(balance × weight(level(o)) / |officials at level(o)|)`
//!
//! Weights are basis points per [`birthright_types::GovernmentLevel`]. The
//! officials come from an injectable [`OfficialsSource`]; the bundled
//! [`StaticRoster`] is a fixed reference dataset, not a live lookup.
//!
//! The crate also carries the client-side choreography around a claim: the
//! staged [`DiscoverySequence`] and the [`ClaimSession`] screen flow.

pub mod allocation;
pub mod discovery;
pub mod error;
pub mod params;
pub mod roster;
pub mod session;

pub use allocation::{compute_allocations, AllocationTable, Allocator, Share};
pub use discovery::{DiscoveryCanceller, DiscoveryOutcome, DiscoverySequence, DiscoveryStage};
pub use error::{GovernanceError, SessionError};
pub use params::LevelWeights;
pub use roster::{GovernanceProfile, LawCounts, OfficialsSource, StaticRoster};
pub use session::{ClaimSession, Screen, VerificationPolicy, VerifiedHuman};
