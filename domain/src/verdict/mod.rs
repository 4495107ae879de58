//! Verdicts - votes, verification results, and weighted consensus.
//!
//! A verifier agent inspects one [`VerificationContext`](crate::context::VerificationContext)
//! and returns a [`VerificationResult`]. The [`ConsensusEngine`] aggregates a
//! complete batch of results into one [`ConsensusResult`] using
//! priority-weighted scoring and veto rules.

pub mod consensus;
pub mod explain;
pub mod vote;

pub use consensus::{ConsensusAction, ConsensusEngine, ConsensusResult};
pub use explain::explain;
pub use vote::{SafetyVote, VerificationResult};
