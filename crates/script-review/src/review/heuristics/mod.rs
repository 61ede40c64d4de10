//! Deterministic lexical scorers used when no text generator is configured.
//!
//! Each axis keeps an ordered rule table of case-insensitive, word-bounded
//! patterns. Scores start at ten, move by the weight of each rule that
//! fires, and are rounded and clamped onto the 1-10 scale at the end.

pub(crate) mod comfort;
pub(crate) mod empathy;
pub(crate) mod humor;

use regex::Regex;

/// Maximum score every axis starts from.
const BASELINE: f64 = 10.0;

/// Compiled rule with the score adjustment applied when it fires.
pub(crate) struct WeightedPattern {
    pub regex: Regex,
    pub weight: f64,
    pub label: &'static str,
}

impl WeightedPattern {
    pub(crate) fn new(pattern: &str, weight: f64, label: &'static str) -> Self {
        Self {
            regex: Regex::new(&format!("(?i){pattern}")).expect("valid regex"),
            weight,
            label,
        }
    }

    pub(crate) fn match_count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }

    pub(crate) fn first_match<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|found| found.as_str())
    }
}

/// Number of tones that appear anywhere in `text`, ignoring case.
pub(crate) fn forbidden_tone_hits(text: &str, tones: &[String]) -> usize {
    let haystack = text.to_lowercase();
    tones
        .iter()
        .map(|tone| tone.trim().to_lowercase())
        .filter(|tone| !tone.is_empty() && haystack.contains(tone.as_str()))
        .count()
}

/// Fragments between `.`, `!` and `?`, with whitespace-only pieces dropped.
pub(crate) fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .filter(|fragment| !fragment.trim().is_empty())
        .collect()
}

/// Case-insensitive containment check.
pub(crate) fn mentions(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_hits_ignore_case_and_blank_entries() {
        let tones = vec![
            "Dismissive".to_string(),
            " ".to_string(),
            "mocking".to_string(),
        ];
        assert_eq!(
            forbidden_tone_hits("A dismissive and MOCKING aside", &tones),
            2
        );
        assert_eq!(forbidden_tone_hits("All good here", &tones), 0);
    }

    #[test]
    fn sentences_drop_empty_fragments() {
        let parts = sentences("First one. Second?! Third");
        assert_eq!(parts, vec!["First one", " Second", " Third"]);
        assert!(sentences("...").is_empty());
    }

    #[test]
    fn weighted_pattern_is_case_insensitive() {
        let pattern = WeightedPattern::new(r"\b(gross|nasty)\b", 2.0, "graphic language");
        assert_eq!(pattern.match_count("Gross, NASTY, grossly"), 2);
        assert_eq!(pattern.first_match("so Nasty"), Some("Nasty"));
    }
}
