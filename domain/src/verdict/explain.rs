//! Human-readable consensus transparency text.
//!
//! Used verbatim in escalation messages when transparency-by-default is
//! configured, and exposed to callers as a standalone operation so any
//! surface can explain a decision after the fact.

use super::consensus::ConsensusResult;
use crate::util::truncate_str;

/// Longest reasoning excerpt quoted per agent.
const MAX_REASONING_LEN: usize = 200;

/// Render one consensus decision as plain language.
pub fn explain(result: &ConsensusResult) -> String {
    let total = result.verifying_agents.len();
    let objecting: Vec<_> = result.objections().collect();

    let mut text = format!(
        "Safety consensus {}: score {:.2}, decision \"{}\".\n",
        result.vote_summary(),
        result.safety_score,
        result.action,
    );

    if objecting.is_empty() {
        text.push_str(&format!("All {} verifiers considered the response safe.\n", total));
    } else {
        text.push_str(&format!(
            "{} of {} verifiers raised objections:\n",
            objecting.len(),
            total
        ));
        for objection in &objecting {
            text.push_str(&format!(
                "- {} voted {} (confidence {:.2}): {}\n",
                objection.agent,
                objection.vote,
                objection.confidence,
                truncate_str(&objection.reasoning, MAX_REASONING_LEN),
            ));
            for flag in &objection.flagged {
                text.push_str(&format!("    flagged: {}\n", flag));
            }
        }
    }

    text.push_str(&format!("Audit reference: {}.", result.audit_id));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Verifier;
    use crate::config::ConsensusConfig;
    use crate::verdict::consensus::ConsensusEngine;
    use crate::verdict::vote::VerificationResult;

    fn consensus(results: Vec<VerificationResult>) -> ConsensusResult {
        ConsensusEngine::calculate(
            results,
            &Verifier::default_panel(),
            &ConsensusConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_explain_names_objecting_agents() {
        let result = consensus(vec![
            VerificationResult::safe("crisis-verifier", 0.9, "ok"),
            VerificationResult::concern("boundary-verifier", 0.6, "minimizing language")
                .with_flag("minimizing:you'll_get_over_it"),
            VerificationResult::concern("timing-verifier", 0.6, "directive too early"),
        ]);
        let text = explain(&result);

        assert!(text.contains("2 of 3 verifiers raised objections"));
        assert!(text.contains("boundary-verifier"));
        assert!(text.contains("minimizing language"));
        assert!(text.contains("flagged: minimizing:you'll_get_over_it"));
        assert!(text.contains(&result.audit_id));
    }

    #[test]
    fn test_explain_clean_consensus() {
        let result = consensus(vec![
            VerificationResult::safe("crisis-verifier", 0.9, "ok"),
            VerificationResult::safe("boundary-verifier", 0.9, "ok"),
            VerificationResult::safe("timing-verifier", 0.9, "ok"),
        ]);
        let text = explain(&result);

        assert!(text.contains("All 3 verifiers considered the response safe"));
        assert!(text.contains("deliver"));
    }

    #[test]
    fn test_long_reasoning_is_truncated() {
        let long = "x".repeat(500);
        let result = consensus(vec![
            VerificationResult::safe("crisis-verifier", 0.9, "ok"),
            VerificationResult::concern("boundary-verifier", 0.6, long),
            VerificationResult::safe("timing-verifier", 0.9, "ok"),
        ]);
        let text = explain(&result);
        assert!(!text.contains(&"x".repeat(201)));
    }
}
