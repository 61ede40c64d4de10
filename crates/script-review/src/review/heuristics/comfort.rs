use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use tracing::trace;

use super::{forbidden_tone_hits, sentences, WeightedPattern, BASELINE};
use crate::review::domain::{clamp_score, ComfortFeedback, RulesConfig};

const TONE_PENALTY: f64 = 1.5;
const EXCERPT_FALLBACK_CHARS: usize = 100;

static EMBARRASSMENT_TRIGGERS: LazyLock<Vec<WeightedPattern>> = LazyLock::new(|| {
    vec![
        WeightedPattern::new(
            r"\b(gross|disgusting|nasty|yucky|icky)\b",
            2.0,
            "graphic language",
        ),
        WeightedPattern::new(
            r"\b(laugh at|make fun of|ridicule)\b",
            2.0,
            "mockery of the condition",
        ),
        WeightedPattern::new(
            r"\b(shame|embarrassment|humiliated)\b",
            1.5,
            "shame language",
        ),
        WeightedPattern::new(
            r"\b(before/after|transformation)\b",
            1.0,
            "appearance comparison",
        ),
        WeightedPattern::new(
            r"\b(extreme symptoms|suffering)\b",
            1.0,
            "graphic symptom description",
        ),
    ]
});

static GENTLER_WORDING: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        ("gross", "challenging"),
        ("disgusting", "difficult"),
        ("nasty", "uncomfortable"),
        ("yucky", "bothersome"),
        ("icky", "annoying"),
        ("laugh at", "understand"),
        ("make fun of", "acknowledge"),
        ("ridicule", "relate to"),
        ("shame", "confidence"),
        ("embarrassment", "comfort"),
        ("humiliated", "empowered"),
    ]
    .into_iter()
    .map(|(word, gentler)| {
        let regex = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word))).expect("valid regex");
        (regex, gentler)
    })
    .collect()
});

/// Scores how comfortable a user would be watching or sharing the script.
pub(crate) fn evaluate(raw_script: &str, rules: &RulesConfig) -> ComfortFeedback {
    let mut score = BASELINE;
    score -= TONE_PENALTY * forbidden_tone_hits(raw_script, &rules.forbidden_tones) as f64;

    let mut flagged: Option<&str> = None;
    for trigger in EMBARRASSMENT_TRIGGERS.iter() {
        let hits = trigger.match_count(raw_script);
        if hits == 0 {
            continue;
        }
        score -= trigger.weight * hits as f64;
        trace!(rule = trigger.label, hits, "comfort trigger fired");
        if flagged.is_none() {
            flagged = trigger.first_match(raw_script);
        }
    }

    let (flagged_line, reasoning) = match flagged {
        Some(excerpt) => {
            let line = excerpt.trim().to_string();
            let reasoning = format!(
                "Reduced comfort due to potentially embarrassing language or tone. The phrase \"{line}\" may make users self-conscious about their condition. A gentler, more affirming approach maintains the message while respecting user dignity."
            );
            (line, reasoning)
        }
        None => {
            let line = middle_sentence(raw_script).trim().to_string();
            let reasoning = format!(
                "No embarrassing language detected. The line \"{line}\" was the least comfortable candidate and reads acceptably; keep the affirming tone."
            );
            (line, reasoning)
        }
    };

    ComfortFeedback {
        score: clamp_score(score),
        replacement: gentler_wording(&flagged_line),
        flagged_line,
        reasoning,
    }
}

/// Applies the fixed substitution table in order, word-bounded and ignoring case.
pub(crate) fn gentler_wording(line: &str) -> String {
    GENTLER_WORDING
        .iter()
        .fold(line.to_string(), |current, (regex, gentler)| {
            regex.replace_all(&current, NoExpand(*gentler)).into_owned()
        })
        .trim()
        .to_string()
}

fn middle_sentence(raw_script: &str) -> &str {
    let candidates = sentences(raw_script);
    match candidates.get(candidates.len() / 2) {
        Some(sentence) => *sentence,
        None => leading_chars(raw_script, EXCERPT_FALLBACK_CHARS),
    }
}

fn leading_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
