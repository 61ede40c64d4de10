use std::sync::LazyLock;

use tracing::trace;

use super::{forbidden_tone_hits, mentions, WeightedPattern, BASELINE};
use crate::review::domain::{clamp_score, EmpathyFeedback, RulesConfig};

const TONE_PENALTY: f64 = 2.0;

pub(crate) const ACKNOWLEDGE_STRUGGLE_EDIT: &str = "Add a line like: \"We understand how challenging this can be, and we're here to support you every step of the way.\"";
pub(crate) const REFRAME_STATEMENT_EDIT: &str = "Replace a technical statement with empathetic framing. For example, change \"This product treats the condition\" to \"This product helps you manage your condition with confidence and comfort.\"";
pub(crate) const COMMUNITY_EDIT: &str = "Include community language: \"You're not alone in this journey—thousands of people have found relief using our product.\"";
pub(crate) const VALIDATION_EDIT: &str = "Add validation: Instead of focusing only on product features, include \"Your experience matters, and we've designed this with your real-world needs in mind.\"";

const REASONING: &str = "These edits transform the script from transactional to relational. By acknowledging the user's emotional experience and emphasizing community and support, we create a deeper connection. Users feel understood rather than lectured to, which builds trust and loyalty.";

static WARMTH_INDICATORS: LazyLock<Vec<WeightedPattern>> = LazyLock::new(|| {
    vec![
        WeightedPattern::new(
            r"\b(understand|know|feel|support|we're here|you're not alone|together|I've been there)\b",
            1.0,
            "support and understanding",
        ),
        WeightedPattern::new(
            r"\b(challenging|difficult|tough|hard|struggle)\b",
            0.8,
            "struggle acknowledgment",
        ),
        WeightedPattern::new(
            r"\b(deserve|deserve better|worthy|valuable|important)\b",
            1.2,
            "affirmation",
        ),
        WeightedPattern::new(
            r"\b(journey|path|progress|improve|better)\b",
            0.7,
            "growth and journey",
        ),
        WeightedPattern::new(r"\b(just|simply|easy|obvious|just stop)\b", -1.5, "minimizing"),
        WeightedPattern::new(
            r"\b(problem|defect|broken|wrong|fail)\b",
            -0.8,
            "defect framing",
        ),
        WeightedPattern::new(
            r"\b(try harder|get over it|be positive|think happy)\b",
            -2.0,
            "dismissive encouragement",
        ),
        WeightedPattern::new(
            r"\b(suffer from|victim of|afflicted)\b",
            -1.0,
            "victim framing",
        ),
    ]
});

/// Scores how warm and supportive the script reads.
pub(crate) fn evaluate(raw_script: &str, rules: &RulesConfig) -> EmpathyFeedback {
    let mut score = BASELINE;
    score -= TONE_PENALTY * forbidden_tone_hits(raw_script, &rules.forbidden_tones) as f64;

    for indicator in WARMTH_INDICATORS.iter() {
        let hits = indicator.match_count(raw_script);
        if hits > 0 {
            trace!(rule = indicator.label, hits, "empathy indicator fired");
            score += indicator.weight * hits as f64;
        }
    }

    let (edit1, edit2) = suggested_edits(raw_script);
    EmpathyFeedback {
        score: clamp_score(score),
        edit1: edit1.to_string(),
        edit2: edit2.to_string(),
        reasoning: REASONING.to_string(),
    }
}

/// Picks the two edits, switching to targeted suggestions when the script
/// lacks the vocabulary the defaults build on.
fn suggested_edits(raw_script: &str) -> (&'static str, &'static str) {
    let edit1 = if !mentions(raw_script, "understand") && !mentions(raw_script, "support") {
        REFRAME_STATEMENT_EDIT
    } else {
        ACKNOWLEDGE_STRUGGLE_EDIT
    };

    let edit2 = if !mentions(raw_script, "journey") && !mentions(raw_script, "alone") {
        VALIDATION_EDIT
    } else {
        COMMUNITY_EDIT
    };

    (edit1, edit2)
}
