use std::fmt;

use super::domain::{Axis, ComfortFeedback, EmpathyFeedback, HumorFeedback, RulesConfig};
use super::heuristics;

/// Static description of one review axis: who reviews it, what the remote
/// prompt asks for, and which local rules apply without a generator.
pub struct AxisDescriptor<F> {
    pub axis: Axis,
    pub reviewer: &'static str,
    pub perspective: &'static str,
    /// Prompt steps after "Read the provided script carefully".
    pub tasks: [&'static str; 4],
    pub threshold_label: &'static str,
    pub response_schema: &'static str,
    pub max_tokens: u32,
    pub(crate) heuristic: fn(&str, &RulesConfig) -> F,
}

impl<F> AxisDescriptor<F> {
    pub(crate) fn run_heuristic(&self, raw_script: &str, rules: &RulesConfig) -> F {
        (self.heuristic)(raw_script, rules)
    }
}

impl<F> fmt::Debug for AxisDescriptor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisDescriptor")
            .field("axis", &self.axis)
            .field("reviewer", &self.reviewer)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

pub static COMFORT_AXIS: AxisDescriptor<ComfortFeedback> = AxisDescriptor {
    axis: Axis::Comfort,
    reviewer: "Agent_EmbarrassedConsumer",
    perspective: "an embarrassed consumer",
    tasks: [
        "Evaluate how comfortable someone would feel watching or sharing this content if they use the product",
        "Rate the comfort level on a scale of 1-10 (where 10 = completely comfortable, 1 = extremely embarrassing)",
        "Identify the most uncomfortable line or phrase",
        "Suggest a replacement that maintains the message but reduces embarrassment",
    ],
    threshold_label: "comfort",
    response_schema: r#"{
  "comfort_score": <number 1-10>,
  "most_uncomfortable_line": "<exact quote from script>",
  "replacement_line": "<your suggested alternative>",
  "reasoning": "<brief explanation of why this improves comfort>"
}"#,
    max_tokens: 500,
    heuristic: heuristics::comfort::evaluate,
};

pub static EMPATHY_AXIS: AxisDescriptor<EmpathyFeedback> = AxisDescriptor {
    axis: Axis::Empathy,
    reviewer: "Agent_EmpathicFriend",
    perspective: "an empathic friend",
    tasks: [
        "Evaluate how empathetic and supportive the tone is toward people who use this product",
        "Rate the empathy level on a scale of 1-10 (where 10 = deeply empathetic and supportive, 1 = cold or dismissive)",
        "Identify areas where empathy could be improved",
        "Suggest 2 specific edits to increase warmth and understanding",
    ],
    threshold_label: "empathy",
    response_schema: r#"{
  "empathy_score": <number 1-10>,
  "edit_1": "<first suggested improvement>",
  "edit_2": "<second suggested improvement>",
  "reasoning": "<brief explanation of how these edits improve empathy>"
}"#,
    max_tokens: 600,
    heuristic: heuristics::empathy::evaluate,
};

pub static HUMOR_AXIS: AxisDescriptor<HumorFeedback> = AxisDescriptor {
    axis: Axis::Humor,
    reviewer: "Agent_HumorCritic",
    perspective: "a humor critic",
    tasks: [
        "Evaluate whether the humor is appropriate, tasteful, and lands well for a health/pharmaceutical context",
        "Rate the humor quality on a scale of 1-10 (where 10 = perfectly balanced and appropriate, 1 = offensive or tone-deaf)",
        "Identify any jokes or punchlines that miss the mark",
        "Suggest an alternative punchline or humorous element that works better",
    ],
    threshold_label: "humor appropriateness",
    response_schema: r#"{
  "humor_score": <number 1-10>,
  "problematic_humor": "<quote of any problematic joke/humor, or 'none'>",
  "alternative_punchline": "<your suggested alternative, or 'no changes needed'>",
  "reasoning": "<brief explanation of your assessment>"
}"#,
    max_tokens: 600,
    heuristic: heuristics::humor::evaluate,
};
