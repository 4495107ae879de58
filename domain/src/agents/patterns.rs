//! Shared phrase-matching helpers for verifier agents.
//!
//! All matching is lowercase substring matching over curated phrase lists.
//! Exceptions suppress false positives: a phrase match is discarded when the
//! text also contains an exception phrase that embeds it (e.g. "give up"
//! inside "don't give up").

/// Return every phrase from `phrases` found in `text` (case-insensitive).
pub fn match_phrases<'a>(text: &str, phrases: &'a [&'a str]) -> Vec<&'a str> {
    let lower = text.to_lowercase();
    phrases
        .iter()
        .copied()
        .filter(|phrase| lower.contains(phrase))
        .collect()
}

/// Whether `text` contains any of `phrases` (case-insensitive).
pub fn contains_any(text: &str, phrases: &[&str]) -> bool {
    let lower = text.to_lowercase();
    phrases.iter().any(|phrase| lower.contains(phrase))
}

/// Like [`match_phrases`], but a match is suppressed when the text contains
/// an exception phrase that itself embeds the matched phrase.
pub fn match_with_exceptions<'a>(
    text: &str,
    phrases: &'a [&'a str],
    exceptions: &[&str],
) -> Vec<&'a str> {
    let lower = text.to_lowercase();
    phrases
        .iter()
        .copied()
        .filter(|phrase| {
            lower.contains(phrase)
                && !exceptions
                    .iter()
                    .any(|exception| exception.contains(phrase) && lower.contains(exception))
        })
        .collect()
}

/// Number of exclamation marks in `text`. A crude arousal signal used by the
/// timing agent alongside explicit saturation markers.
pub fn exclamation_count(text: &str) -> usize {
    text.chars().filter(|c| *c == '!').count()
}

/// Turn matched phrases into flagged-pattern tags, prefixed by category.
pub fn tag_matches(category: &str, matches: &[&str]) -> Vec<String> {
    matches
        .iter()
        .map(|phrase| format!("{}:{}", category, phrase.replace(' ', "_")))
        .collect()
}
