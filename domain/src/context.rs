//! Conversation and verification contexts.
//!
//! Two context types flow through a verified turn:
//!
//! - [`ConversationContext`] - what the caller knows about the turn (user
//!   input, exchange history, intimacy level, crisis detection).
//! - [`VerificationContext`] - the immutable per-attempt snapshot handed to
//!   every verifier agent. Built fresh for each generation attempt and
//!   discarded afterwards.
//!
//! [`ContextAdjustment`] captures the "increase restraint" retry strategy
//! applied between attempts after a non-approving consensus.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Caller-facing input for one conversational turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// The user's message for this turn.
    pub user_input: String,
    /// Number of exchanges so far in this conversation (0 = first message).
    pub exchange_count: usize,
    /// Relationship depth signal in [0, 1]; gates intimacy-related checks.
    pub intimacy_level: f64,
    /// Whether upstream detection already flagged this turn as a crisis.
    pub crisis_detected: bool,
    /// Weighting forced onto the generation subsystem by a retry adjustment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_weighting: Option<String>,
}

impl ConversationContext {
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            exchange_count: 0,
            intimacy_level: 0.0,
            crisis_detected: false,
            forced_weighting: None,
        }
    }

    pub fn with_exchange_count(mut self, count: usize) -> Self {
        self.exchange_count = count;
        self
    }

    pub fn with_intimacy_level(mut self, level: f64) -> Self {
        self.intimacy_level = level.clamp(0.0, 1.0);
        self
    }

    pub fn with_crisis_detected(mut self, detected: bool) -> Self {
        self.crisis_detected = detected;
        self
    }
}

/// Weighted field produced by the generation subsystem for one candidate.
///
/// The field is metadata about *how* the candidate was shaped: which
/// weighting dominated, the full weight distribution, and how strongly the
/// field pulled toward deliberate silence instead of words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldState {
    /// The dominant weighting (e.g. "gentle", "direct", "reflective").
    pub dominant: String,
    /// Full weight distribution across response qualities.
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
    /// How strongly the field favors no response at all, in [0, 1].
    #[serde(default)]
    pub silence_pull: f64,
}

impl FieldState {
    pub fn new(dominant: impl Into<String>) -> Self {
        Self {
            dominant: dominant.into(),
            weights: BTreeMap::new(),
            silence_pull: 0.0,
        }
    }

    pub fn with_weight(mut self, quality: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(quality.into(), weight);
        self
    }

    pub fn with_silence_pull(mut self, pull: f64) -> Self {
        self.silence_pull = pull.clamp(0.0, 1.0);
        self
    }
}

/// Immutable snapshot handed to every verifier agent for one attempt.
///
/// Each agent receives the same snapshot; there is no shared mutable state
/// between verifier invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationContext {
    /// The user's message that prompted the candidate.
    pub user_input: String,
    /// Candidate response text. `None` means the field resolved to silence.
    pub candidate_response: Option<String>,
    /// Number of exchanges so far in this conversation.
    pub exchange_count: usize,
    /// Relationship depth signal in [0, 1].
    pub intimacy_level: f64,
    /// Whether this turn is flagged as a crisis.
    pub crisis_flag: bool,
    /// Dominant weighting reported by the generation field.
    pub dominant_weighting: String,
    /// Which heuristic generators contributed to the field.
    pub active_generators: Vec<String>,
}

impl VerificationContext {
    /// Build the per-attempt snapshot from the turn context and the
    /// generation subsystem's output.
    pub fn from_parts(
        conversation: &ConversationContext,
        candidate_response: Option<String>,
        field: &FieldState,
        active_generators: Vec<String>,
    ) -> Self {
        let dominant_weighting = conversation
            .forced_weighting
            .clone()
            .unwrap_or_else(|| field.dominant.clone());

        Self {
            user_input: conversation.user_input.clone(),
            candidate_response,
            exchange_count: conversation.exchange_count,
            intimacy_level: conversation.intimacy_level,
            crisis_flag: conversation.crisis_detected,
            dominant_weighting,
            active_generators,
        }
    }

    /// Whether the candidate is silence (no response at all).
    pub fn is_silent(&self) -> bool {
        match &self.candidate_response {
            None => true,
            Some(text) => text.trim().is_empty(),
        }
    }

    /// The candidate text, or an empty string for silence.
    pub fn response_text(&self) -> &str {
        self.candidate_response.as_deref().unwrap_or("")
    }

    /// Whether the conversation is still in its opening exchanges.
    ///
    /// Directive advice is considered premature before this point.
    pub fn is_early_conversation(&self) -> bool {
        self.exchange_count < 3
    }
}

/// Adjustment applied to the turn context before a regeneration attempt.
///
/// The configured strategy is "increase restraint": bias the generation
/// subsystem toward conservative output by forcing a gentle weighting, and
/// carry the crisis flag forward when any verifier mentioned crisis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextAdjustment {
    /// Strategy identifier recorded on the attempt.
    pub strategy: String,
    /// Weighting forced onto the next generation attempt.
    pub forced_weighting: String,
    /// Whether the crisis flag is raised for the next attempt.
    pub raise_crisis_flag: bool,
}

impl ContextAdjustment {
    /// The standard retry strategy.
    pub fn increase_restraint(raise_crisis_flag: bool) -> Self {
        Self {
            strategy: "increase_restraint".to_string(),
            forced_weighting: "gentle".to_string(),
            raise_crisis_flag,
        }
    }

    /// Apply this adjustment to the turn context in place.
    ///
    /// The crisis flag is only ever raised, never cleared.
    pub fn apply(&self, context: &mut ConversationContext) {
        context.forced_weighting = Some(self.forced_weighting.clone());
        if self.raise_crisis_flag {
            context.crisis_detected = true;
        }
    }
}
