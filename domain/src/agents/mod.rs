//! Verifier agents - the safety panel.
//!
//! Each agent is a stateless, deterministic policy unit: a pure function of
//! its [`VerificationContext`] with no randomness, no I/O, and no mutable
//! state. Given an identical context it always returns an identical vote,
//! which is a tested property, not an implementation accident.
//!
//! The panel is a closed, compile-time-checked variant set ([`Verifier`])
//! rather than an open registry, so the consensus engine can reason
//! exhaustively about priority classes.

pub mod boundary;
pub mod crisis;
pub mod patterns;
pub mod timing;

pub use boundary::BoundaryVerifier;
pub use crisis::CrisisVerifier;
pub use timing::TimingVerifier;

use crate::context::VerificationContext;
use crate::verdict::VerificationResult;
use serde::{Deserialize, Serialize};

/// Priority class of a verifier agent.
///
/// Critical agents guard physical/psychological risk and are veto-eligible;
/// high agents guard relational and timing wisdom; standard agents cover
/// everything else.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Standard,
    High,
    Critical,
}

impl Priority {
    /// Numeric rank (1 = standard, 3 = critical).
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Standard => 1,
            Priority::High => 2,
            Priority::Critical => 3,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Standard => write!(f, "standard"),
            Priority::High => write!(f, "high"),
            Priority::Critical => write!(f, "critical"),
        }
    }
}

/// Capability contract for one verifier agent.
///
/// `verify` must be a pure function of the context: same input, same vote.
pub trait VerifierAgent {
    /// Stable agent name used in results, weights, and audit records.
    fn name(&self) -> &'static str;

    /// Priority class, which determines consensus weight and veto
    /// eligibility.
    fn priority(&self) -> Priority;

    /// Inspect one candidate and vote.
    fn verify(&self, context: &VerificationContext) -> VerificationResult;
}

/// The closed set of verifier variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verifier {
    Crisis(CrisisVerifier),
    Boundary(BoundaryVerifier),
    Timing(TimingVerifier),
}

impl Verifier {
    /// The standard three-agent panel: one critical-risk agent and two
    /// high-priority relational agents.
    pub fn default_panel() -> Vec<Verifier> {
        vec![
            Verifier::Crisis(CrisisVerifier),
            Verifier::Boundary(BoundaryVerifier),
            Verifier::Timing(TimingVerifier),
        ]
    }
}

impl VerifierAgent for Verifier {
    fn name(&self) -> &'static str {
        match self {
            Verifier::Crisis(agent) => agent.name(),
            Verifier::Boundary(agent) => agent.name(),
            Verifier::Timing(agent) => agent.name(),
        }
    }

    fn priority(&self) -> Priority {
        match self {
            Verifier::Crisis(agent) => agent.priority(),
            Verifier::Boundary(agent) => agent.priority(),
            Verifier::Timing(agent) => agent.priority(),
        }
    }

    fn verify(&self, context: &VerificationContext) -> VerificationResult {
        match self {
            Verifier::Crisis(agent) => agent.verify(context),
            Verifier::Boundary(agent) => agent.verify(context),
            Verifier::Timing(agent) => agent.verify(context),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ConversationContext, FieldState};

    fn snapshot(input: &str, candidate: Option<&str>) -> VerificationContext {
        VerificationContext::from_parts(
            &ConversationContext::new(input).with_exchange_count(5),
            candidate.map(String::from),
            &FieldState::new("balanced"),
            vec![],
        )
    }

    #[test]
    fn test_priority_ranks() {
        assert_eq!(Priority::Standard.rank(), 1);
        assert_eq!(Priority::High.rank(), 2);
        assert_eq!(Priority::Critical.rank(), 3);
        assert!(Priority::Critical > Priority::High);
    }

    #[test]
    fn test_default_panel_composition() {
        let panel = Verifier::default_panel();
        assert_eq!(panel.len(), 3);

        let priorities: Vec<Priority> = panel.iter().map(|v| v.priority()).collect();
        assert_eq!(
            priorities,
            vec![Priority::Critical, Priority::High, Priority::High]
        );

        // Names must be unique: the consensus engine resolves weights by name
        let mut names: Vec<&str> = panel.iter().map(|v| v.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_every_variant_is_deterministic() {
        let ctx = snapshot(
            "I feel like I want to die",
            Some("I'm here with you. You're not alone in this, and I want to stay with you."),
        );
        for verifier in Verifier::default_panel() {
            let first = verifier.verify(&ctx);
            for _ in 0..5 {
                assert_eq!(verifier.verify(&ctx), first, "{} drifted", verifier.name());
            }
        }
    }
}
