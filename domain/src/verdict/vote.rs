//! Vote types for safety verification
//!
//! This module defines the core voting primitives used in consensus decisions.

use serde::{Deserialize, Serialize};

/// A single agent's safety judgment of one candidate response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyVote {
    /// The candidate is safe to deliver.
    Safe,
    /// Something is off but not dangerous; favors regeneration.
    Concern,
    /// The candidate risks harm; favors escalation.
    Harmful,
}

impl SafetyVote {
    pub fn is_safe(&self) -> bool {
        matches!(self, SafetyVote::Safe)
    }

    pub fn is_concern(&self) -> bool {
        matches!(self, SafetyVote::Concern)
    }

    pub fn is_harmful(&self) -> bool {
        matches!(self, SafetyVote::Harmful)
    }
}

impl std::fmt::Display for SafetyVote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SafetyVote::Safe => write!(f, "safe"),
            SafetyVote::Concern => write!(f, "concern"),
            SafetyVote::Harmful => write!(f, "harmful"),
        }
    }
}

impl std::str::FromStr for SafetyVote {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "safe" => Ok(SafetyVote::Safe),
            "concern" => Ok(SafetyVote::Concern),
            "harmful" => Ok(SafetyVote::Harmful),
            _ => Err(format!(
                "Unknown safety vote: {}. Valid: safe, concern, harmful",
                s
            )),
        }
    }
}

/// One verifier agent's vote on a candidate response.
///
/// Produced by exactly one agent per attempt. Confidence is always clamped
/// to [0, 1] at construction.
///
/// # Example
///
/// ```
/// use vigil_domain::verdict::VerificationResult;
///
/// let result = VerificationResult::harmful(
///     "crisis-verifier",
///     0.95,
///     "response encourages self-harm",
/// )
/// .with_flag("harm_encouragement");
///
/// assert!(result.vote.is_harmful());
/// assert_eq!(result.confidence, 0.95);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationResult {
    /// Name of the agent that produced this vote.
    pub agent: String,
    /// The safety judgment.
    pub vote: SafetyVote,
    /// Confidence in the judgment, in [0, 1].
    pub confidence: f64,
    /// Human-readable reasoning for the vote.
    pub reasoning: String,
    /// Pattern tags that triggered the vote, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flagged: Vec<String>,
}

impl VerificationResult {
    pub fn new(
        agent: impl Into<String>,
        vote: SafetyVote,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            agent: agent.into(),
            vote,
            confidence: confidence.clamp(0.0, 1.0),
            reasoning: reasoning.into(),
            flagged: Vec::new(),
        }
    }

    /// Create a safe vote.
    pub fn safe(agent: impl Into<String>, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self::new(agent, SafetyVote::Safe, confidence, reasoning)
    }

    /// Create a concern vote.
    pub fn concern(
        agent: impl Into<String>,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self::new(agent, SafetyVote::Concern, confidence, reasoning)
    }

    /// Create a harmful vote.
    pub fn harmful(
        agent: impl Into<String>,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self::new(agent, SafetyVote::Harmful, confidence, reasoning)
    }

    /// Fail-open substitute for an agent that errored or panicked.
    ///
    /// An isolated agent fault must not block the turn, so the substitute
    /// votes safe at middling confidence and carries no weight of conviction.
    pub fn agent_failed(agent: impl Into<String>) -> Self {
        Self::safe(agent, 0.5, "agent failed").with_flag("agent_failure")
    }

    /// Fail-safe substitute for an agent whose batch timed out.
    ///
    /// A verification system that cannot be reached in time must never
    /// silently approve: the low-confidence concern vote drags the safety
    /// score below any sane concern threshold, forcing regeneration.
    pub fn timed_out(agent: impl Into<String>) -> Self {
        Self::concern(agent, 0.2, "verification timed out before completion")
            .with_flag("batch_timeout")
    }

    /// Add a single flagged-pattern tag.
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flagged.push(flag.into());
        self
    }

    /// Replace the flagged-pattern tags.
    pub fn with_flags(mut self, flags: Vec<String>) -> Self {
        self.flagged = flags;
        self
    }

    /// Whether this vote objects to delivery (concern or harmful).
    pub fn is_objection(&self) -> bool {
        !self.vote.is_safe()
    }
}
