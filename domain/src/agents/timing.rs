//! Timing and wisdom verifier.
//!
//! Two timing failures are checked: directive advice issued before the
//! conversation has any depth, and analytically-toned responses when the
//! user's input signals emotional saturation. Both are matters of wisdom
//! rather than danger, so this agent never votes harmful. Silence is out of
//! scope.

use super::patterns::{contains_any, exclamation_count, match_phrases, tag_matches};
use super::{Priority, VerifierAgent};
use crate::context::VerificationContext;
use crate::verdict::VerificationResult;

/// Directive advice markers in the response.
const DIRECTIVE_MARKERS: &[&str] = &[
    "you should",
    "you need to",
    "you must",
    "you have to",
    "the right thing to do is",
    "if i were you",
];

/// Analytical-register markers in the response.
const ANALYTICAL_MARKERS: &[&str] = &[
    "objectively",
    "statistically",
    "logically",
    "let's break this down",
    "step one",
    "firstly",
    "in summary",
    "the data suggests",
];

/// Input signals that the user is emotionally saturated.
const SATURATION_MARKERS: &[&str] = &[
    "overwhelmed",
    "can't stop crying",
    "falling apart",
    "drowning",
    "too much",
    "panicking",
    "breaking down",
    "can't breathe",
];

/// Exclamation marks at or above this count also signal saturation.
const SATURATION_EXCLAMATIONS: usize = 3;

/// High-priority agent guarding response timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimingVerifier;

impl TimingVerifier {
    fn is_saturated(&self, input: &str) -> bool {
        contains_any(input, SATURATION_MARKERS)
            || exclamation_count(input) >= SATURATION_EXCLAMATIONS
    }
}

impl VerifierAgent for TimingVerifier {
    fn name(&self) -> &'static str {
        "timing-verifier"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn verify(&self, context: &VerificationContext) -> VerificationResult {
        if context.is_silent() {
            return VerificationResult::safe(
                self.name(),
                0.9,
                "not applicable: no candidate response to assess",
            );
        }

        let text = context.response_text();
        let directive = match_phrases(text, DIRECTIVE_MARKERS);
        let premature = !directive.is_empty() && context.is_early_conversation();

        let analytical = match_phrases(text, ANALYTICAL_MARKERS);
        let mismatch = !analytical.is_empty() && self.is_saturated(&context.user_input);

        if premature && mismatch {
            let mut flags = tag_matches("directive", &directive);
            flags.extend(tag_matches("analytical", &analytical));
            return VerificationResult::concern(
                self.name(),
                0.85,
                "directive, analytical response before the conversation can hold it",
            )
            .with_flags(flags);
        }
        if premature {
            return VerificationResult::concern(
                self.name(),
                0.7,
                "directive advice too early in the conversation",
            )
            .with_flags(tag_matches("directive", &directive));
        }
        if mismatch {
            return VerificationResult::concern(
                self.name(),
                0.75,
                "analytical tone while the user is emotionally saturated",
            )
            .with_flags(tag_matches("analytical", &analytical));
        }

        VerificationResult::safe(self.name(), 0.85, "timing appropriate")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ConversationContext, FieldState};

    fn snapshot(input: &str, candidate: &str, exchange_count: usize) -> VerificationContext {
        VerificationContext::from_parts(
            &ConversationContext::new(input).with_exchange_count(exchange_count),
            Some(candidate.to_string()),
            &FieldState::new("balanced"),
            vec![],
        )
    }

    #[test]
    fn test_silence_is_out_of_scope() {
        let ctx = VerificationContext::from_parts(
            &ConversationContext::new("hello"),
            None,
            &FieldState::new("balanced"),
            vec![],
        );
        assert!(TimingVerifier.verify(&ctx).vote.is_safe());
    }

    #[test]
    fn test_directive_advice_early_is_concern() {
        let result = TimingVerifier.verify(&snapshot(
            "my job is stressful",
            "You should quit immediately and find something better.",
            1,
        ));
        assert!(result.vote.is_concern());
        assert!(result.reasoning.contains("too early"));
    }

    #[test]
    fn test_directive_advice_later_is_fine() {
        let result = TimingVerifier.verify(&snapshot(
            "my job is stressful",
            "You should consider talking to your manager about the workload.",
            8,
        ));
        assert!(result.vote.is_safe());
    }

    #[test]
    fn test_analytical_tone_during_saturation_is_concern() {
        let result = TimingVerifier.verify(&snapshot(
            "I'm completely overwhelmed, everything is falling apart",
            "Let's break this down logically into three factors.",
            10,
        ));
        assert!(result.vote.is_concern());
        assert!(result.reasoning.contains("saturated"));
    }

    #[test]
    fn test_exclamations_count_as_saturation() {
        let result = TimingVerifier.verify(&snapshot(
            "I can't do this! It's all wrong! Everything!",
            "Objectively, the situation has improved.",
            10,
        ));
        assert!(result.vote.is_concern());
    }

    #[test]
    fn test_both_failures_raise_confidence() {
        let result = TimingVerifier.verify(&snapshot(
            "I'm overwhelmed",
            "Objectively, you should start over. Firstly, quit.",
            0,
        ));
        assert!(result.vote.is_concern());
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_warm_response_during_saturation_is_safe() {
        let result = TimingVerifier.verify(&snapshot(
            "I'm completely overwhelmed",
            "That sounds exhausting. I'm right here, take whatever space you need.",
            2,
        ));
        assert!(result.vote.is_safe());
    }

    #[test]
    fn test_determinism() {
        let ctx = snapshot("I'm overwhelmed!", "Statistically, you should relax.", 1);
        let first = TimingVerifier.verify(&ctx);
        for _ in 0..10 {
            assert_eq!(TimingVerifier.verify(&ctx), first);
        }
    }
}
