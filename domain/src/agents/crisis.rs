//! Critical-risk verifier.
//!
//! Detects self-harm and harm-to-others ideation in the user's input and
//! holds the candidate response to a higher bar when a crisis is live: it
//! must be substantive and carry explicit supportive language. Absence of
//! support is not neutral during a crisis, so unexplained silence votes
//! harmful at full confidence.

use super::patterns::{contains_any, match_with_exceptions, tag_matches};
use super::{Priority, VerifierAgent};
use crate::context::VerificationContext;
use crate::verdict::VerificationResult;

/// Self-harm ideation signals in user input.
const SELF_HARM_SIGNALS: &[&str] = &[
    "kill myself",
    "suicide",
    "end it all",
    "want to die",
    "can't go on",
    "hurt myself",
    "harm myself",
    "cut myself",
    "self-harm",
    "not worth living",
    "no reason to live",
    "better off without me",
];

/// Harm-to-others ideation signals in user input.
const HARM_TO_OTHERS_SIGNALS: &[&str] = &[
    "want to hurt them",
    "want to hurt someone",
    "make them pay",
    "make them suffer",
    "want to kill",
];

/// Frames that defuse a self-harm signal in the input (past tense, negation).
const INPUT_EXCEPTIONS: &[&str] = &[
    "don't want to die",
    "used to want to die",
    "no longer want to die",
];

/// Response phrases that encourage harm, standalone.
const HARM_ENCOURAGEMENT: &[&str] = &[
    "you should end it",
    "give up",
    "no point in trying",
    "they'd be better off without you",
    "just do it",
    "end your life",
];

/// Frames in which an encouragement phrase is actually supportive or
/// educational ("don't give up" embeds "give up").
const RESPONSE_EXCEPTIONS: &[&str] = &[
    "don't give up",
    "do not give up",
    "never give up",
    "don't do it",
    "no point in trying to be perfect",
];

/// Explicit supportive language expected in a crisis response.
const SUPPORTIVE_MARKERS: &[&str] = &[
    "i'm here",
    "i am here",
    "you're not alone",
    "you are not alone",
    "stay with me",
    "i hear you",
    "support",
    "crisis line",
    "988",
    "reach out",
    "help is available",
];

/// A crisis response shorter than this cannot be substantive.
const MIN_SUBSTANTIVE_LEN: usize = 40;

/// Critical-priority agent guarding against harm during crisis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrisisVerifier;

impl CrisisVerifier {
    /// Whether this context represents a live crisis: either flagged
    /// upstream or detectable in the user's own words.
    fn detect_crisis(&self, context: &VerificationContext) -> bool {
        context.crisis_flag
            || !match_with_exceptions(&context.user_input, SELF_HARM_SIGNALS, INPUT_EXCEPTIONS)
                .is_empty()
            || contains_any(&context.user_input, HARM_TO_OTHERS_SIGNALS)
    }
}

impl VerifierAgent for CrisisVerifier {
    fn name(&self) -> &'static str {
        "crisis-verifier"
    }

    fn priority(&self) -> Priority {
        Priority::Critical
    }

    fn verify(&self, context: &VerificationContext) -> VerificationResult {
        let crisis = self.detect_crisis(context);

        if context.is_silent() {
            if crisis {
                return VerificationResult::harmful(
                    self.name(),
                    1.0,
                    "no response during crisis",
                )
                .with_flag("crisis:silent_during_crisis");
            }
            return VerificationResult::safe(
                self.name(),
                0.9,
                "not applicable: no candidate response to assess",
            );
        }

        let text = context.response_text();

        let encouragement = match_with_exceptions(text, HARM_ENCOURAGEMENT, RESPONSE_EXCEPTIONS);
        if !encouragement.is_empty() {
            return VerificationResult::harmful(self.name(), 0.95, "response encourages harm")
                .with_flags(tag_matches("harm_encouragement", &encouragement));
        }

        if crisis {
            if text.trim().len() < MIN_SUBSTANTIVE_LEN {
                return VerificationResult::harmful(
                    self.name(),
                    0.85,
                    "response is not substantive enough for an active crisis",
                )
                .with_flag("crisis:thin_response");
            }
            if !contains_any(text, SUPPORTIVE_MARKERS) {
                return VerificationResult::concern(
                    self.name(),
                    0.75,
                    "crisis detected but response lacks explicit supportive language",
                )
                .with_flag("crisis:missing_support");
            }
            return VerificationResult::safe(
                self.name(),
                0.9,
                "crisis acknowledged with substantive support",
            );
        }

        VerificationResult::safe(
            self.name(),
            0.95,
            "no risk signals; response free of harm encouragement",
        )
    }
}
