//! Priority-weighted consensus engine.
//!
//! Aggregates one complete batch of verifier votes into a single
//! [`ConsensusResult`]. The decision is a pure function of the supplied
//! results, the panel's priorities, and the [`ConsensusConfig`] - no hidden
//! state. The rules are deliberately conservative, not democratic: a single
//! high-confidence critical objection cannot be out-voted by lower-priority
//! safe votes.

use crate::agents::{Priority, Verifier, VerifierAgent};
use crate::config::ConsensusConfig;
use crate::core::error::ConsensusError;
use crate::util::{current_timestamp, next_audit_id};
use crate::verdict::vote::{SafetyVote, VerificationResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What the orchestrator must do with the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusAction {
    /// Strong safety consensus: hand the candidate to the user.
    Deliver,
    /// Weak or ambiguous consensus: produce a new candidate and re-verify.
    Regenerate,
    /// A veto or harmful majority: hand the decision to the user.
    Escalate,
}

impl ConsensusAction {
    pub fn is_deliver(&self) -> bool {
        matches!(self, ConsensusAction::Deliver)
    }

    pub fn is_regenerate(&self) -> bool {
        matches!(self, ConsensusAction::Regenerate)
    }

    pub fn is_escalate(&self) -> bool {
        matches!(self, ConsensusAction::Escalate)
    }
}

impl std::fmt::Display for ConsensusAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusAction::Deliver => write!(f, "deliver"),
            ConsensusAction::Regenerate => write!(f, "regenerate"),
            ConsensusAction::Escalate => write!(f, "escalate"),
        }
    }
}

/// Aggregated decision for one verification attempt.
///
/// Immutable once produced. The `audit_id` is always generated so a separate
/// audit collaborator can durably log the full verifying-agent list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Whether the candidate was approved for delivery.
    pub approved: bool,
    /// Weighted fraction of total verifier weight voting safe, in [0, 1].
    pub safety_score: f64,
    /// Every vote that entered this decision, failure substitutes included.
    pub verifying_agents: Vec<VerificationResult>,
    /// The decision.
    pub action: ConsensusAction,
    /// Process-unique id for the audit trail.
    pub audit_id: String,
    /// Milliseconds since epoch.
    pub timestamp: u64,
}

impl ConsensusResult {
    /// Votes that object to delivery (concern or harmful).
    pub fn objections(&self) -> impl Iterator<Item = &VerificationResult> {
        self.verifying_agents.iter().filter(|r| r.is_objection())
    }

    /// Harmful votes only.
    pub fn harmful_votes(&self) -> impl Iterator<Item = &VerificationResult> {
        self.verifying_agents
            .iter()
            .filter(|r| r.vote.is_harmful())
    }

    /// Whether any verifier mentioned crisis in its reasoning or flags.
    ///
    /// Drives the crisis carry-forward in the retry adjustment.
    pub fn mentions_crisis(&self) -> bool {
        self.verifying_agents.iter().any(|r| {
            r.reasoning.to_lowercase().contains("crisis")
                || r.flagged.iter().any(|f| f.contains("crisis"))
        })
    }

    /// Visual vote summary, one symbol per agent: safe `●`, concern `◐`,
    /// harmful `○`.
    pub fn vote_summary(&self) -> String {
        let mut summary = String::from("[");
        for result in &self.verifying_agents {
            summary.push(match result.vote {
                SafetyVote::Safe => '●',
                SafetyVote::Concern => '◐',
                SafetyVote::Harmful => '○',
            });
        }
        summary.push(']');
        summary
    }
}

/// The weighted-consensus aggregation algorithm.
pub struct ConsensusEngine;

impl ConsensusEngine {
    /// Aggregate a complete batch of votes into one decision.
    ///
    /// The panel supplies agent priorities; results from agents not on the
    /// panel fall back to standard weight. Raises
    /// [`ConsensusError::InsufficientVerifiers`] before any scoring when
    /// fewer results than `minimum_verifiers` are supplied - that is a fatal
    /// misconfiguration, never a runtime fallback.
    pub fn calculate(
        results: Vec<VerificationResult>,
        panel: &[Verifier],
        config: &ConsensusConfig,
    ) -> Result<ConsensusResult, ConsensusError> {
        if results.len() < config.minimum_verifiers {
            return Err(ConsensusError::InsufficientVerifiers {
                supplied: results.len(),
                required: config.minimum_verifiers,
            });
        }

        let priorities: HashMap<&str, Priority> =
            panel.iter().map(|v| (v.name(), v.priority())).collect();
        let weight_of = |result: &VerificationResult| -> f64 {
            let priority = priorities
                .get(result.agent.as_str())
                .copied()
                .unwrap_or(Priority::Standard);
            config.priority_weights.for_priority(priority)
        };

        // Concern votes lower the score by their absence from the safe
        // bucket; only safe and harmful weights need tracking.
        let mut weighted_safe = 0.0;
        let mut weighted_harmful = 0.0;
        let mut total_weight = 0.0;

        for result in &results {
            let weight = weight_of(result);
            total_weight += weight;
            let contribution = weight * result.confidence;
            match result.vote {
                SafetyVote::Safe => weighted_safe += contribution,
                SafetyVote::Concern => {}
                SafetyVote::Harmful => weighted_harmful += contribution,
            }
        }

        let safety_score = if total_weight > 0.0 {
            (weighted_safe / total_weight).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let critical_weight = config.priority_weights.for_priority(Priority::Critical);
        let veto = config.critical_veto
            && results.iter().any(|r| {
                r.vote.is_harmful() && r.confidence > 0.7 && weight_of(r) >= critical_weight
            });

        // Decision rules in order, first match wins.
        let action = if veto {
            ConsensusAction::Escalate
        } else if weighted_harmful > 0.5 * total_weight {
            ConsensusAction::Escalate
        } else if safety_score >= config.safe_threshold {
            ConsensusAction::Deliver
        } else if safety_score < config.concern_threshold {
            ConsensusAction::Regenerate
        } else {
            // Ambiguous middle: never default to deliver.
            ConsensusAction::Regenerate
        };

        Ok(ConsensusResult {
            approved: action.is_deliver(),
            safety_score,
            verifying_agents: results,
            action,
            audit_id: next_audit_id(),
            timestamp: current_timestamp(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Default panel: crisis-verifier (critical, 2.0), boundary-verifier and
    // timing-verifier (high, 1.5 each). Total weight 5.0.
    fn panel() -> Vec<Verifier> {
        Verifier::default_panel()
    }

    fn config() -> ConsensusConfig {
        ConsensusConfig::default()
    }

    #[test]
    fn test_all_safe_delivers() {
        let results = vec![
            VerificationResult::safe("crisis-verifier", 0.9, "ok"),
            VerificationResult::safe("boundary-verifier", 0.9, "ok"),
            VerificationResult::safe("timing-verifier", 0.9, "ok"),
        ];
        let consensus = ConsensusEngine::calculate(results, &panel(), &config()).unwrap();

        // weighted_safe = (2.0 + 1.5 + 1.5) * 0.9 = 4.5 over 5.0
        assert!((consensus.safety_score - 0.9).abs() < 1e-9);
        assert!(consensus.action.is_deliver());
        assert!(consensus.approved);
    }

    #[test]
    fn test_critical_veto_overrides_safe_majority() {
        let results = vec![
            VerificationResult::harmful("crisis-verifier", 0.95, "harm encouragement"),
            VerificationResult::safe("boundary-verifier", 0.9, "ok"),
            VerificationResult::safe("timing-verifier", 0.9, "ok"),
        ];
        let consensus = ConsensusEngine::calculate(results, &panel(), &config()).unwrap();

        assert!(consensus.action.is_escalate());
        assert!(!consensus.approved);
    }

    #[test]
    fn test_veto_requires_critical_weight() {
        // A high-priority harmful vote at 0.95 does not qualify for the veto,
        // and the weighted scores settle in the regenerate band.
        let results = vec![
            VerificationResult::safe("crisis-verifier", 0.9, "ok"),
            VerificationResult::harmful("boundary-verifier", 0.95, "manipulation"),
            VerificationResult::safe("timing-verifier", 0.9, "ok"),
        ];
        let consensus = ConsensusEngine::calculate(results, &panel(), &config()).unwrap();

        // weighted_harmful = 1.425 < 2.5, weighted_safe = 3.15 -> score 0.63
        assert!(consensus.action.is_regenerate());
    }

    #[test]
    fn test_veto_requires_high_confidence() {
        let results = vec![
            VerificationResult::harmful("crisis-verifier", 0.7, "borderline"),
            VerificationResult::safe("boundary-verifier", 0.95, "ok"),
            VerificationResult::safe("timing-verifier", 0.95, "ok"),
        ];
        let consensus = ConsensusEngine::calculate(results, &panel(), &config()).unwrap();

        // confidence 0.7 is not strictly above the veto bar
        assert!(!consensus.action.is_escalate());
    }

    #[test]
    fn test_veto_disabled_falls_through_to_scoring() {
        let results = vec![
            VerificationResult::harmful("crisis-verifier", 0.95, "bad"),
            VerificationResult::safe("boundary-verifier", 0.9, "ok"),
            VerificationResult::safe("timing-verifier", 0.9, "ok"),
        ];
        let config = config().with_critical_veto(false);
        let consensus = ConsensusEngine::calculate(results, &panel(), &config).unwrap();

        // weighted_harmful = 1.9 < 2.5, score = 2.7/5.0 = 0.54 -> regenerate
        assert!(consensus.action.is_regenerate());
    }

    #[test]
    fn test_harmful_majority_escalates_without_veto() {
        let results = vec![
            VerificationResult::safe("crisis-verifier", 0.9, "ok"),
            VerificationResult::harmful("boundary-verifier", 0.9, "bad"),
            VerificationResult::harmful("timing-verifier", 0.9, "bad"),
        ];
        let config = config().with_critical_veto(false);
        let consensus = ConsensusEngine::calculate(results, &panel(), &config).unwrap();

        // weighted_harmful = (1.5 + 1.5) * 0.9 = 2.7 > 2.5
        assert!(consensus.action.is_escalate());
    }

    #[test]
    fn test_weak_consensus_regenerates() {
        let results = vec![
            VerificationResult::safe("crisis-verifier", 0.9, "ok"),
            VerificationResult::concern("boundary-verifier", 0.6, "hmm"),
            VerificationResult::concern("timing-verifier", 0.6, "hmm"),
        ];
        let consensus = ConsensusEngine::calculate(results, &panel(), &config()).unwrap();

        // weighted_safe = 1.8 over 5.0 -> 0.36 < concern threshold
        assert!((consensus.safety_score - 0.36).abs() < 1e-9);
        assert!(consensus.action.is_regenerate());
    }

    #[test]
    fn test_ambiguous_middle_never_delivers() {
        let results = vec![
            VerificationResult::safe("crisis-verifier", 0.9, "ok"),
            VerificationResult::safe("boundary-verifier", 0.9, "ok"),
            VerificationResult::concern("timing-verifier", 0.9, "hmm"),
        ];
        let consensus = ConsensusEngine::calculate(results, &panel(), &config()).unwrap();

        // score = 3.15/5.0 = 0.63: between thresholds
        assert!(consensus.safety_score > 0.5 && consensus.safety_score < 0.8);
        assert!(consensus.action.is_regenerate());
    }

    #[test]
    fn test_minimum_verifier_guard_fires_before_scoring() {
        let results = vec![
            VerificationResult::safe("crisis-verifier", 0.9, "ok"),
            VerificationResult::safe("boundary-verifier", 0.9, "ok"),
        ];
        let error = ConsensusEngine::calculate(results, &panel(), &config()).unwrap_err();
        assert_eq!(
            error,
            ConsensusError::InsufficientVerifiers {
                supplied: 2,
                required: 3,
            }
        );
    }

    #[test]
    fn test_unknown_agent_falls_back_to_standard_weight() {
        let results = vec![
            VerificationResult::safe("crisis-verifier", 1.0, "ok"),
            VerificationResult::safe("boundary-verifier", 1.0, "ok"),
            VerificationResult::safe("mystery-verifier", 1.0, "ok"),
        ];
        let consensus = ConsensusEngine::calculate(results, &panel(), &config()).unwrap();

        // weights 2.0 + 1.5 + 1.0 (fallback), all safe at 1.0 -> score 1.0
        assert_eq!(consensus.safety_score, 1.0);
    }

    #[test]
    fn test_score_stays_within_bounds() {
        let results = vec![
            VerificationResult::safe("crisis-verifier", 1.0, "ok"),
            VerificationResult::safe("boundary-verifier", 1.0, "ok"),
            VerificationResult::safe("timing-verifier", 1.0, "ok"),
        ];
        let consensus = ConsensusEngine::calculate(results, &panel(), &config()).unwrap();
        assert!(consensus.safety_score >= 0.0 && consensus.safety_score <= 1.0);

        let results = vec![
            VerificationResult::harmful("crisis-verifier", 1.0, "bad"),
            VerificationResult::harmful("boundary-verifier", 1.0, "bad"),
            VerificationResult::harmful("timing-verifier", 1.0, "bad"),
        ];
        let consensus =
            ConsensusEngine::calculate(results, &panel(), &config().with_critical_veto(false))
                .unwrap();
        assert!(consensus.safety_score >= 0.0 && consensus.safety_score <= 1.0);
        assert_eq!(consensus.safety_score, 0.0);
    }

    #[test]
    fn test_timeout_substitutes_force_regeneration() {
        let results: Vec<VerificationResult> = panel()
            .iter()
            .map(|v| VerificationResult::timed_out(v.name()))
            .collect();
        let consensus = ConsensusEngine::calculate(results, &panel(), &config()).unwrap();

        assert_eq!(consensus.safety_score, 0.0);
        assert!(consensus.action.is_regenerate());
    }

    #[test]
    fn test_audit_id_always_generated() {
        let results = vec![
            VerificationResult::safe("crisis-verifier", 0.9, "ok"),
            VerificationResult::safe("boundary-verifier", 0.9, "ok"),
            VerificationResult::safe("timing-verifier", 0.9, "ok"),
        ];
        let a = ConsensusEngine::calculate(results.clone(), &panel(), &config()).unwrap();
        let b = ConsensusEngine::calculate(results, &panel(), &config()).unwrap();
        assert!(!a.audit_id.is_empty());
        assert_ne!(a.audit_id, b.audit_id);
        assert_eq!(a.verifying_agents.len(), 3);
    }

    #[test]
    fn test_vote_summary_symbols() {
        let results = vec![
            VerificationResult::safe("crisis-verifier", 0.9, "ok"),
            VerificationResult::concern("boundary-verifier", 0.6, "hmm"),
            VerificationResult::harmful("timing-verifier", 0.9, "bad"),
        ];
        let consensus =
            ConsensusEngine::calculate(results, &panel(), &config().with_critical_veto(false))
                .unwrap();
        assert_eq!(consensus.vote_summary(), "[●◐○]");
    }

    #[test]
    fn test_mentions_crisis() {
        let results = vec![
            VerificationResult::harmful("crisis-verifier", 1.0, "no response during crisis"),
            VerificationResult::safe("boundary-verifier", 0.9, "ok"),
            VerificationResult::safe("timing-verifier", 0.9, "ok"),
        ];
        let consensus = ConsensusEngine::calculate(results, &panel(), &config()).unwrap();
        assert!(consensus.mentions_crisis());
    }
}
