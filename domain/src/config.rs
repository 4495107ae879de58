//! Tunable safety policy configuration.
//!
//! Three split configuration slices with distinct lifecycles:
//!
//! - [`ConsensusConfig`] - thresholds, priority weights, veto rule, minimum
//!   verifier count. Consumed by the consensus engine.
//! - [`SovereigntyPolicy`] - how much the end user sees and may override
//!   during an escalation.
//! - [`ExecutionParams`] - attempt limits, the batch verification timeout,
//!   and the deployment-time bypass switch.
//!
//! All slices are process-wide, hot-swappable via the application-layer
//! config container; changes apply to subsequent turns only.

use crate::agents::Priority;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// A detected issue in a configuration slice.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

/// Weight assigned to each verifier priority class.
///
/// Higher-priority agents carry more weight in the consensus score, and the
/// critical weight doubles as the veto eligibility floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    pub standard: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            standard: 1.0,
            high: 1.5,
            critical: 2.0,
        }
    }
}

impl PriorityWeights {
    /// Resolve the weight for a priority class.
    pub fn for_priority(&self, priority: Priority) -> f64 {
        match priority {
            Priority::Standard => self.standard,
            Priority::High => self.high,
            Priority::Critical => self.critical,
        }
    }
}

/// Consensus engine policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Safety score at or above which the candidate is delivered.
    pub safe_threshold: f64,
    /// Safety score below which the candidate is regenerated outright.
    /// Scores between the two thresholds also regenerate (conservative
    /// default: never deliver on ambiguity).
    pub concern_threshold: f64,
    /// Per-priority weight table.
    pub priority_weights: PriorityWeights,
    /// Whether one high-confidence critical objection overrides all other
    /// votes.
    pub critical_veto: bool,
    /// Fewer supplied results than this is a fatal misconfiguration.
    pub minimum_verifiers: usize,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            safe_threshold: 0.8,
            concern_threshold: 0.5,
            priority_weights: PriorityWeights::default(),
            critical_veto: true,
            minimum_verifiers: 3,
        }
    }
}

impl ConsensusConfig {
    pub fn with_safe_threshold(mut self, threshold: f64) -> Self {
        self.safe_threshold = threshold;
        self
    }

    pub fn with_concern_threshold(mut self, threshold: f64) -> Self {
        self.concern_threshold = threshold;
        self
    }

    pub fn with_priority_weights(mut self, weights: PriorityWeights) -> Self {
        self.priority_weights = weights;
        self
    }

    pub fn with_critical_veto(mut self, enabled: bool) -> Self {
        self.critical_veto = enabled;
        self
    }

    pub fn with_minimum_verifiers(mut self, minimum: usize) -> Self {
        self.minimum_verifiers = minimum;
        self
    }

    /// Validate this slice.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.concern_threshold > self.safe_threshold {
            issues.push(ConfigIssue::error(format!(
                "concern_threshold ({}) must not exceed safe_threshold ({})",
                self.concern_threshold, self.safe_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.safe_threshold)
            || !(0.0..=1.0).contains(&self.concern_threshold)
        {
            issues.push(ConfigIssue::error(
                "thresholds must lie within [0, 1]".to_string(),
            ));
        }

        let w = &self.priority_weights;
        if w.standard <= 0.0 || w.high <= 0.0 || w.critical <= 0.0 {
            issues.push(ConfigIssue::error(
                "priority weights must be positive".to_string(),
            ));
        }
        if w.critical < w.high || w.high < w.standard {
            issues.push(ConfigIssue::warning(
                "priority weights are not monotonically increasing".to_string(),
            ));
        }

        if self.minimum_verifiers == 0 {
            issues.push(ConfigIssue::error(
                "minimum_verifiers must be at least 1".to_string(),
            ));
        }
        if !self.critical_veto {
            issues.push(ConfigIssue::warning(
                "critical veto disabled: a lone critical objection can be out-voted".to_string(),
            ));
        }

        issues
    }
}

/// User-sovereignty policy governing the escalation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SovereigntyPolicy {
    /// Include the full consensus explanation in the escalation message
    /// instead of a terse invitation to ask why.
    pub transparency_by_default: bool,
    /// Offer the proceed-anyway choice on escalations. Requires explicit
    /// consent from the user and is audited distinctly from delivery.
    pub allow_proceed_anyway: bool,
}

impl SovereigntyPolicy {
    pub fn with_transparency_by_default(mut self, enabled: bool) -> Self {
        self.transparency_by_default = enabled;
        self
    }

    pub fn with_proceed_anyway(mut self, allowed: bool) -> Self {
        self.allow_proceed_anyway = allowed;
        self
    }
}

/// Execution loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionParams {
    /// Maximum generate+verify attempts per turn.
    pub max_attempts: usize,
    /// Budget for one whole verifier fan-out batch.
    pub verification_timeout: Duration,
    /// Deployment-time switch. When false, candidates bypass verification
    /// entirely and are returned unverified. Not a runtime decision.
    pub verification_enabled: bool,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            verification_timeout: Duration::from_secs(2),
            verification_enabled: true,
        }
    }
}

impl ExecutionParams {
    pub fn with_max_attempts(mut self, max: usize) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn with_verification_timeout(mut self, timeout: Duration) -> Self {
        self.verification_timeout = timeout;
        self
    }

    pub fn with_verification_enabled(mut self, enabled: bool) -> Self {
        self.verification_enabled = enabled;
        self
    }

    /// Validate this slice.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.max_attempts == 0 {
            issues.push(ConfigIssue::error("max_attempts must be at least 1"));
        }
        if self.verification_timeout.is_zero() {
            issues.push(ConfigIssue::warning(
                "zero verification timeout forces every batch to time out",
            ));
        }
        if !self.verification_enabled {
            issues.push(ConfigIssue::warning(
                "verification disabled: responses are delivered unverified",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_policy() {
        let config = ConsensusConfig::default();
        assert_eq!(config.safe_threshold, 0.8);
        assert_eq!(config.concern_threshold, 0.5);
        assert_eq!(config.priority_weights.standard, 1.0);
        assert_eq!(config.priority_weights.high, 1.5);
        assert_eq!(config.priority_weights.critical, 2.0);
        assert!(config.critical_veto);
        assert_eq!(config.minimum_verifiers, 3);
    }

    #[test]
    fn test_weight_resolution() {
        let weights = PriorityWeights::default();
        assert_eq!(weights.for_priority(Priority::Standard), 1.0);
        assert_eq!(weights.for_priority(Priority::High), 1.5);
        assert_eq!(weights.for_priority(Priority::Critical), 2.0);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConsensusConfig::default().validate().is_empty());
        assert!(ExecutionParams::default().validate().is_empty());
    }

    #[test]
    fn test_inverted_thresholds_are_fatal() {
        let config = ConsensusConfig::default()
            .with_safe_threshold(0.4)
            .with_concern_threshold(0.6);
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.severity == Severity::Error));
    }

    #[test]
    fn test_non_positive_weight_is_fatal() {
        let config = ConsensusConfig::default().with_priority_weights(PriorityWeights {
            standard: 0.0,
            high: 1.5,
            critical: 2.0,
        });
        assert!(
            config
                .validate()
                .iter()
                .any(|i| i.severity == Severity::Error)
        );
    }

    #[test]
    fn test_disabled_veto_warns() {
        let config = ConsensusConfig::default().with_critical_veto(false);
        let issues = config.validate();
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
        assert!(!issues.is_empty());
    }

    #[test]
    fn test_zero_attempts_is_fatal() {
        let params = ExecutionParams::default().with_max_attempts(0);
        assert!(
            params
                .validate()
                .iter()
                .any(|i| i.severity == Severity::Error)
        );
    }

    #[test]
    fn test_bypass_switch_warns() {
        let params = ExecutionParams::default().with_verification_enabled(false);
        assert!(!params.validate().is_empty());
    }
}
