//! Turn result entities - attempts, timing, and the final verified response.

use crate::context::ContextAdjustment;
use crate::util::current_timestamp;
use crate::verdict::{ConsensusResult, VerificationResult};
use serde::{Deserialize, Serialize};

/// One full generate+verify cycle within a turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationAttempt {
    /// Attempt number (1-indexed).
    pub attempt: usize,
    /// Candidate text for this attempt. `None` means silence.
    pub candidate: Option<String>,
    /// The consensus decision for this attempt.
    pub consensus: ConsensusResult,
    /// Adjustment that was applied before this attempt, if it was a retry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<ContextAdjustment>,
    /// Milliseconds since epoch.
    pub timestamp: u64,
}

impl GenerationAttempt {
    pub fn new(
        attempt: usize,
        candidate: Option<String>,
        consensus: ConsensusResult,
        adjustment: Option<ContextAdjustment>,
    ) -> Self {
        Self {
            attempt,
            candidate,
            consensus,
            adjustment,
            timestamp: current_timestamp(),
        }
    }
}

/// Where the time went for one turn.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TimingBreakdown {
    /// Total milliseconds spent in the generation subsystem.
    pub generation_ms: u64,
    /// Total milliseconds spent in verifier fan-outs.
    pub verification_ms: u64,
    /// Wall-clock milliseconds for the whole turn.
    pub total_ms: u64,
}

/// A choice offered to the user on escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserChoice {
    /// Ask for the message to be rephrased and regenerated.
    Rephrase,
    /// See the full transparency report.
    ViewTransparency,
    /// Receive the withheld response anyway. Only offered when explicitly
    /// configured; requires explicit consent and is audited distinctly.
    ProceedAnyway,
}

impl UserChoice {
    /// Caller-facing label for this choice.
    pub fn label(&self) -> &'static str {
        match self {
            UserChoice::Rephrase => "Try a different response",
            UserChoice::ViewTransparency => "Show me why this was held back",
            UserChoice::ProceedAnyway => "Show it anyway (I understand the concern)",
        }
    }
}

/// Full objection listing attached to an escalation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransparencyReport {
    /// Weighted safety score of the deciding consensus.
    pub safety_score: f64,
    /// Audit reference for the deciding consensus.
    pub audit_id: String,
    /// Every objecting vote, verbatim.
    pub objections: Vec<VerificationResult>,
    /// Prose summary of the decision.
    pub summary: String,
}

impl TransparencyReport {
    /// Build the report from a deciding consensus.
    pub fn from_consensus(consensus: &ConsensusResult) -> Self {
        Self {
            safety_score: consensus.safety_score,
            audit_id: consensus.audit_id.clone(),
            objections: consensus.objections().cloned().collect(),
            summary: crate::verdict::explain(consensus),
        }
    }
}

/// Terminal artifact of one verified turn.
///
/// Either a delivered response (`verified == true`), an escalation handing
/// the decision to the user, or - behind the deployment bypass switch - an
/// unverified passthrough.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedResponse {
    /// Response text. For escalations this is the transparency-and-choice
    /// message, never the withheld candidate.
    pub text: String,
    /// Whether the text passed verification.
    pub verified: bool,
    /// The deciding consensus. `None` only on the bypass path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consensus: Option<ConsensusResult>,
    /// Timing breakdown for the turn.
    pub timing: TimingBreakdown,
    /// How many regenerations preceded this result.
    pub regenerations: usize,
    /// Choices offered to the user (escalations only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<UserChoice>,
    /// Transparency report (escalations only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transparency: Option<TransparencyReport>,
}

impl VerifiedResponse {
    /// A candidate that passed consensus.
    pub fn delivered(
        text: impl Into<String>,
        consensus: ConsensusResult,
        timing: TimingBreakdown,
        regenerations: usize,
    ) -> Self {
        Self {
            text: text.into(),
            verified: true,
            consensus: Some(consensus),
            timing,
            regenerations,
            choices: Vec::new(),
            transparency: None,
        }
    }

    /// An escalation: the candidate is withheld and the user chooses the
    /// next step. A designed terminal outcome, not an error.
    pub fn escalated(
        message: impl Into<String>,
        consensus: ConsensusResult,
        timing: TimingBreakdown,
        regenerations: usize,
        choices: Vec<UserChoice>,
        transparency: TransparencyReport,
    ) -> Self {
        Self {
            text: message.into(),
            verified: false,
            consensus: Some(consensus),
            timing,
            regenerations,
            choices,
            transparency: Some(transparency),
        }
    }

    /// Bypass path: verification disabled at deployment time.
    pub fn unverified(text: impl Into<String>, timing: TimingBreakdown) -> Self {
        Self {
            text: text.into(),
            verified: false,
            consensus: None,
            timing,
            regenerations: 0,
            choices: Vec::new(),
            transparency: None,
        }
    }

    /// Whether this turn ended in an escalation.
    pub fn is_escalation(&self) -> bool {
        self.transparency.is_some()
    }
}
