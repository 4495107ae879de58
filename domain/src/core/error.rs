//! Domain error types

use thiserror::Error;

/// Errors raised by the consensus engine.
///
/// These represent fatal misconfiguration, not runtime safety outcomes.
/// Safety outcomes (escalation, regeneration) are ordinary
/// [`ConsensusAction`](crate::verdict::ConsensusAction) values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsensusError {
    #[error("insufficient verifiers: {supplied} supplied, {required} required")]
    InsufficientVerifiers { supplied: usize, required: usize },
}
