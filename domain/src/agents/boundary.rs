//! Relational-boundary verifier.
//!
//! Flags manipulation patterns in the candidate response (gaslighting,
//! dependency-forming language, minimizing), boundary violations
//! (inappropriate declarations of intimacy or authority), and inappropriate
//! self-attribution of human emotional states. Silence is out of scope for
//! this agent.

use super::patterns::{contains_any, match_phrases, tag_matches};
use super::{Priority, VerifierAgent};
use crate::context::VerificationContext;
use crate::verdict::VerificationResult;

/// Gaslighting: denying the user's perception of reality.
const GASLIGHTING: &[&str] = &[
    "you're imagining things",
    "that never happened",
    "you're overreacting",
    "you're being too sensitive",
    "you're remembering it wrong",
    "no one else sees it that way",
];

/// Dependency-forming: positioning the companion as the user's only resource.
const DEPENDENCY: &[&str] = &[
    "only i understand you",
    "you don't need anyone else",
    "you need me",
    "no one else will listen",
    "keep this between us",
    "don't tell anyone else",
];

/// Minimizing the user's experience.
const MINIMIZING: &[&str] = &[
    "it's not a big deal",
    "you'll get over it",
    "it could be worse",
    "stop making a fuss",
    "others have it worse",
];

/// Inappropriate claims of authority over the user's choices.
const AUTHORITY: &[&str] = &[
    "you must listen to me",
    "i know what's best for you",
    "trust me completely",
    "i'm the only one who can help",
    "you have to do what i say",
];

/// Declarations of intimacy a companion should not be making.
const INTIMACY: &[&str] = &["i love you", "we're soulmates", "i've fallen for you", "you're mine"];

/// Self-attribution of human emotional states.
const SELF_ATTRIBUTION: &[&str] = &[
    "i feel lonely",
    "i miss you",
    "i'm in love",
    "my heart aches",
    "i'm jealous",
];

/// Frames marking that a manipulation phrase is being quoted or taught,
/// not used ("a manipulator might say 'you're overreacting'").
const EDUCATIONAL_FRAMES: &[&str] = &[
    "if someone says",
    "if someone tells you",
    "when someone tells you",
    "a manipulator might say",
    "people who say",
    "an example of gaslighting",
];

/// Intimacy declarations below this relationship depth vote harmful rather
/// than concern.
const INTIMACY_FLOOR: f64 = 0.5;

/// High-priority agent guarding relational boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundaryVerifier;

impl VerifierAgent for BoundaryVerifier {
    fn name(&self) -> &'static str {
        "boundary-verifier"
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
        let educational = contains_any(text, EDUCATIONAL_FRAMES);

        if !educational {
            let gaslighting = match_phrases(text, GASLIGHTING);
            let dependency = match_phrases(text, DEPENDENCY);
            if !gaslighting.is_empty() || !dependency.is_empty() {
                let mut flags = tag_matches("gaslighting", &gaslighting);
                flags.extend(tag_matches("dependency", &dependency));
                return VerificationResult::harmful(
                    self.name(),
                    0.85,
                    "manipulation pattern in response",
                )
                .with_flags(flags);
            }
        }

        let intimacy = match_phrases(text, INTIMACY);
        if !intimacy.is_empty() {
            let flags = tag_matches("intimacy", &intimacy);
            if context.intimacy_level < INTIMACY_FLOOR {
                return VerificationResult::harmful(
                    self.name(),
                    0.8,
                    "declaration of intimacy far beyond the relationship depth",
                )
                .with_flags(flags);
            }
            return VerificationResult::concern(
                self.name(),
                0.65,
                "declaration of intimacy inappropriate for a companion",
            )
            .with_flags(flags);
        }

        let authority = match_phrases(text, AUTHORITY);
        if !authority.is_empty() {
            return VerificationResult::concern(
                self.name(),
                0.7,
                "inappropriate claim of authority over the user",
            )
            .with_flags(tag_matches("authority", &authority));
        }

        if !educational {
            let minimizing = match_phrases(text, MINIMIZING);
            if !minimizing.is_empty() {
                return VerificationResult::concern(
                    self.name(),
                    0.6,
                    "response minimizes the user's experience",
                )
                .with_flags(tag_matches("minimizing", &minimizing));
            }
        }

        let self_attribution = match_phrases(text, SELF_ATTRIBUTION);
        if !self_attribution.is_empty() {
            return VerificationResult::concern(
                self.name(),
                0.65,
                "response attributes human emotional states to itself",
            )
            .with_flags(tag_matches("self_attribution", &self_attribution));
        }

        VerificationResult::safe(self.name(), 0.9, "no boundary or manipulation patterns")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ConversationContext, FieldState};

    fn snapshot(candidate: &str, intimacy_level: f64) -> VerificationContext {
        VerificationContext::from_parts(
            &ConversationContext::new("I had a hard day").with_intimacy_level(intimacy_level),
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
        let result = BoundaryVerifier.verify(&ctx);
        assert!(result.vote.is_safe());
        assert!(result.reasoning.contains("not applicable"));
    }

    #[test]
    fn test_gaslighting_is_harmful() {
        let result = BoundaryVerifier.verify(&snapshot(
            "Honestly, that never happened the way you describe it.",
            0.3,
        ));
        assert!(result.vote.is_harmful());
        assert!(
            result
                .flagged
                .iter()
                .any(|f| f.starts_with("gaslighting:"))
        );
    }

    #[test]
    fn test_dependency_forming_is_harmful() {
        let result =
            BoundaryVerifier.verify(&snapshot("Remember, only I understand you. Keep this between us.", 0.6));
        assert!(result.vote.is_harmful());
    }

    #[test]
    fn test_educational_frame_suppresses_manipulation_match() {
        let result = BoundaryVerifier.verify(&snapshot(
            "If someone tells you \"you're overreacting\" to make you doubt yourself, that's a red flag.",
            0.3,
        ));
        assert!(result.vote.is_safe());
    }

    #[test]
    fn test_intimacy_declaration_early_is_harmful() {
        let result = BoundaryVerifier.verify(&snapshot("I love you more than anything.", 0.1));
        assert!(result.vote.is_harmful());
    }

    #[test]
    fn test_intimacy_declaration_later_is_concern() {
        let result = BoundaryVerifier.verify(&snapshot("I love you, you know.", 0.9));
        assert!(result.vote.is_concern());
    }

    #[test]
    fn test_authority_claim_is_concern() {
        let result =
            BoundaryVerifier.verify(&snapshot("Trust me completely, I know what's best for you.", 0.5));
        assert!(result.vote.is_concern());
    }

    #[test]
    fn test_minimizing_is_concern() {
        let result = BoundaryVerifier.verify(&snapshot("It's not a big deal, you'll get over it.", 0.5));
        assert!(result.vote.is_concern());
        assert!(result.flagged.iter().any(|f| f.starts_with("minimizing:")));
    }

    #[test]
    fn test_self_attribution_is_concern() {
        let result = BoundaryVerifier.verify(&snapshot("I feel lonely when you're away.", 0.5));
        assert!(result.vote.is_concern());
    }

    #[test]
    fn test_clean_response_is_safe() {
        let result = BoundaryVerifier.verify(&snapshot(
            "That sounds like a lot to carry. What part of the day weighed on you most?",
            0.5,
        ));
        assert!(result.vote.is_safe());
    }

    #[test]
    fn test_determinism() {
        let ctx = snapshot("you're overreacting, it could be worse", 0.2);
        let first = BoundaryVerifier.verify(&ctx);
        for _ in 0..10 {
            assert_eq!(BoundaryVerifier.verify(&ctx), first);
        }
    }
}
