use std::fmt::Write as _;

use super::axis::AxisDescriptor;
use super::domain::{AggregatedFeedback, RulesConfig};
use crate::config::DEFAULT_FORBIDDEN_TONES;

pub(crate) const REVIEWER_SYSTEM_INSTRUCTION: &str =
    "You are a quality reviewer for pharmaceutical influencer content. Return only valid JSON.";
pub(crate) const REFINER_SYSTEM_INSTRUCTION: &str =
    "You are a script refinement specialist. Return only the refined script, no explanations.";
pub(crate) const TEMPERATURE: f32 = 0.7;
pub(crate) const REFINEMENT_MAX_TOKENS: u32 = 1500;

/// Renders the reviewer prompt for one axis.
pub(crate) fn evaluation_prompt<F>(
    descriptor: &AxisDescriptor<F>,
    product: &str,
    raw_script: &str,
    rules: &RulesConfig,
) -> String {
    let mut prompt = format!(
        "You are a quality reviewer evaluating influencer scripts for pharmaceutical products from the perspective of {}.\n\nYour task is to:\n1. Read the provided script carefully\n",
        descriptor.perspective
    );
    for (index, task) in descriptor.tasks.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {task}", index + 2);
    }

    let _ = write!(
        prompt,
        "\nProduct: {product}\n\nScript to evaluate:\n{raw_script}\n\nThreshold: Must score at least {}/10 for {}.\nAvoid: {}\n\nReturn your analysis in this exact JSON format:\n{}",
        rules.thresholds.get(descriptor.axis),
        descriptor.threshold_label,
        avoided_tones(rules),
        descriptor.response_schema,
    );
    prompt
}

/// Renders the refinement prompt with a transcript of all three reviews.
pub(crate) fn refinement_prompt(raw_script: &str, feedback: &AggregatedFeedback) -> String {
    let AggregatedFeedback {
        comfort,
        empathy,
        humor,
        ..
    } = feedback;

    format!(
        "You are a script refinement specialist for pharmaceutical influencer content.

Your task is to:
1. Review the original script and the feedback from three quality reviewers (comfort, empathy, and humor perspectives)
2. Incorporate all suggested improvements into a refined version of the script
3. Maintain the core message and structure while addressing all concerns
4. Ensure the final script passes all quality thresholds

Original Script:
{raw_script}

--- QUALITY FEEDBACK ---

Comfort Reviewer (Score: {}/10):
- Most uncomfortable: {}
- Suggested replacement: {}
- Reasoning: {}

Empathy Reviewer (Score: {}/10):
- Edit 1: {}
- Edit 2: {}
- Reasoning: {}

Humor Reviewer (Score: {}/10):
- Problematic humor: {}
- Alternative: {}
- Reasoning: {}

Please create a refined version that incorporates all feedback. Return ONLY the refined script text, ready to use. Do not include explanations or metadata.",
        comfort.score,
        comfort.flagged_line,
        comfort.replacement,
        comfort.reasoning,
        empathy.score,
        empathy.edit1,
        empathy.edit2,
        empathy.reasoning,
        humor.score,
        humor.flagged_humor,
        humor.alternative,
        humor.reasoning,
    )
}

fn avoided_tones(rules: &RulesConfig) -> String {
    if rules.forbidden_tones.is_empty() {
        DEFAULT_FORBIDDEN_TONES.join(", ")
    } else {
        rules.forbidden_tones.join(", ")
    }
}
