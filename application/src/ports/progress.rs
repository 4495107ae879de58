//! Verification progress port
//!
//! Defines the interface for reporting progress during a verified turn.

use vigil_domain::{ConsensusAction, SafetyVote};

/// Callback for progress updates during verification
///
/// Implementations live in presentation layers and can display progress in
/// various ways (console, web UI, etc.)
pub trait VerificationProgress: Send + Sync {
    /// Called when a generation attempt starts.
    fn on_attempt_start(&self, attempt: usize, max_attempts: usize);

    /// Called when one verifier agent completes its vote.
    fn on_agent_complete(&self, agent: &str, vote: &SafetyVote);

    /// Called once per attempt when consensus is reached.
    fn on_consensus(&self, action: &ConsensusAction, safety_score: f64);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoVerificationProgress;

impl VerificationProgress for NoVerificationProgress {
    fn on_attempt_start(&self, _attempt: usize, _max_attempts: usize) {}
    fn on_agent_complete(&self, _agent: &str, _vote: &SafetyVote) {}
    fn on_consensus(&self, _action: &ConsensusAction, _safety_score: f64) {}
}
