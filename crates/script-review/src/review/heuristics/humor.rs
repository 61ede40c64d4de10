use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use tracing::trace;

use super::{forbidden_tone_hits, WeightedPattern, BASELINE};
use crate::review::domain::{
    clamp_score, HumorFeedback, RulesConfig, NO_CHANGES_NEEDED, NO_FLAGGED_HUMOR,
};

const TONE_PENALTY: f64 = 1.5;
const APPROPRIATE_HUMOR_BONUS: f64 = 1.0;

const SELF_AWARE_REFRAME: &str = "Reframe this as self-aware humor: \"We all know how frustrating this can be—here's the part where we actually help.\"";
const BALANCED_REASONING: &str = "The humor in this script is well-balanced and appropriate for the pharmaceutical context. It connects with users without being dismissive.";

static PROBLEM_PATTERNS: LazyLock<Vec<WeightedPattern>> = LazyLock::new(|| {
    vec![
        WeightedPattern::new(
            r"\b(that's what you get|serves you right|your fault)\b",
            2.5,
            "blames the user",
        ),
        WeightedPattern::new(
            r"\b(gross|disgusting|ugly|nasty)\b.*?(?:condition|symptom|skin|body)",
            2.5,
            "mocks the condition",
        ),
        WeightedPattern::new(
            r"\b(joke's on you|jokes on you|sucker)\b",
            2.0,
            "belittles users",
        ),
        WeightedPattern::new(
            r"\b(death|dying|fatal|kill you)\b",
            2.5,
            "dark humor about health",
        ),
        WeightedPattern::new(
            r"\b(crazy|insane|mental|nuts)\b",
            1.5,
            "mental health as punchline",
        ),
        WeightedPattern::new(
            r"\b(loser|pathetic|sad|pitiful)\b",
            2.0,
            "disparages users",
        ),
    ]
});

static APPROPRIATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"relatable.*?(?:struggle|challenge)",
        r"lighthearted.*?(?:journey|experience)",
        r"funny.*?(?:because we all know|because it's true)",
        r"humor.*?(?:breaks the ice|makes it easier)",
    ]
    .into_iter()
    .map(|pattern| Regex::new(&format!("(?i){pattern}")).expect("valid regex"))
    .collect()
});

static MILDER_PHRASES: LazyLock<Vec<(&'static str, Regex, &'static str)>> = LazyLock::new(|| {
    [
        ("gross", "let's be real about it"),
        ("disgusting", "honest truth is"),
        ("ugly", "less than ideal"),
        ("nasty", "uncomfortable"),
        ("that's what you get", "that's when you need support"),
        ("serves you right", "here's what actually helps"),
        ("joke's on you", "plot twist: we have solutions"),
        ("jokes on you", "plot twist: we have solutions"),
        ("sucker", "friend"),
        ("loser", "someone figuring it out"),
        ("pathetic", "struggling"),
        ("sad", "challenging"),
        ("pitiful", "tough"),
    ]
    .into_iter()
    .map(|(harsh, milder)| {
        let regex = Regex::new(&format!("(?i){}", regex::escape(harsh))).expect("valid regex");
        (harsh, regex, milder)
    })
    .collect()
});

/// Scores whether the humor suits a health context and flags the first
/// problematic joke.
pub(crate) fn evaluate(raw_script: &str, rules: &RulesConfig) -> HumorFeedback {
    let mut score = BASELINE;
    score -= TONE_PENALTY * forbidden_tone_hits(raw_script, &rules.forbidden_tones) as f64;

    let mut flagged: Option<&str> = None;
    for pattern in PROBLEM_PATTERNS.iter() {
        if let Some(excerpt) = pattern.first_match(raw_script) {
            trace!(rule = pattern.label, "problematic humor matched");
            score -= pattern.weight;
            flagged.get_or_insert(excerpt);
        }
    }

    let appropriate = APPROPRIATE_PATTERNS
        .iter()
        .filter(|pattern| pattern.is_match(raw_script))
        .count();
    score += APPROPRIATE_HUMOR_BONUS * appropriate as f64;

    match flagged {
        Some(excerpt) => HumorFeedback {
            score: clamp_score(score),
            flagged_humor: excerpt.to_string(),
            alternative: milder_alternative(excerpt),
            reasoning: format!(
                "The phrase \"{excerpt}\" uses humor that may offend or demean users. In pharmaceutical contexts, humor should unite rather than divide, comfort rather than mock."
            ),
        },
        None => HumorFeedback {
            score: clamp_score(score),
            flagged_humor: NO_FLAGGED_HUMOR.to_string(),
            alternative: NO_CHANGES_NEEDED.to_string(),
            reasoning: BALANCED_REASONING.to_string(),
        },
    }
}

/// Swaps the first table key found in `excerpt` for its milder phrase, or
/// falls back to a generic reframe.
pub(crate) fn milder_alternative(excerpt: &str) -> String {
    let lowered = excerpt.to_lowercase();
    MILDER_PHRASES
        .iter()
        .find(|(harsh, _, _)| lowered.contains(harsh))
        .map(|(_, regex, milder)| regex.replace_all(excerpt, NoExpand(*milder)).into_owned())
        .unwrap_or_else(|| SELF_AWARE_REFRAME.to_string())
}
