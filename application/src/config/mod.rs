//! Verifier configuration container.
//!
//! [`VerifierConfig`] groups the three split domain policy slices into a
//! single container that the orchestrator holds behind a lock.
//!
//! # Design
//!
//! The consensus engine receives only [`ConsensusConfig`]; the escalation
//! builder only [`SovereigntyPolicy`]; the attempt loop only
//! [`ExecutionParams`] (honest type signatures). The container exists for
//! hot-swapping: `update_config` replaces the whole container atomically,
//! and changes apply to subsequent turns only.

mod loader;

pub use loader::{ConfigLoader, FileConfig};

use vigil_domain::{ConfigIssue, ConsensusConfig, ExecutionParams, Severity, SovereigntyPolicy};

/// Configuration container for the self-auditing orchestrator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerifierConfig {
    consensus: ConsensusConfig,
    sovereignty: SovereigntyPolicy,
    execution: ExecutionParams,
}

impl VerifierConfig {
    /// Create a new VerifierConfig from the three split slices.
    pub fn new(
        consensus: ConsensusConfig,
        sovereignty: SovereigntyPolicy,
        execution: ExecutionParams,
    ) -> Self {
        Self {
            consensus,
            sovereignty,
            execution,
        }
    }

    // ==================== Accessors ====================

    /// Consensus engine policy.
    pub fn consensus(&self) -> &ConsensusConfig {
        &self.consensus
    }

    /// Escalation surface policy.
    pub fn sovereignty(&self) -> &SovereigntyPolicy {
        &self.sovereignty
    }

    /// Attempt loop control parameters.
    pub fn execution(&self) -> &ExecutionParams {
        &self.execution
    }

    // ==================== Builder Methods ====================

    pub fn with_consensus(mut self, consensus: ConsensusConfig) -> Self {
        self.consensus = consensus;
        self
    }

    pub fn with_sovereignty(mut self, sovereignty: SovereigntyPolicy) -> Self {
        self.sovereignty = sovereignty;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }

    // ==================== Validation ====================

    /// Validate all slices.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.consensus.validate();
        issues.extend(self.execution.validate());
        issues
    }

    /// Check whether any issues are errors (i.e. fatal).
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}
