use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::axis::{AxisDescriptor, COMFORT_AXIS, EMPATHY_AXIS, HUMOR_AXIS};
use super::domain::{Axis, AxisFeedback, ComfortFeedback, EmpathyFeedback, HumorFeedback, RulesConfig};
use super::error::{ReviewError, ReviewStage};
use super::generation::{GenerationMode, GenerationRequest};
use super::prompts::{evaluation_prompt, REVIEWER_SYSTEM_INSTRUCTION, TEMPERATURE};

pub type ComfortEvaluator = AxisEvaluator<ComfortFeedback>;
pub type EmpathyEvaluator = AxisEvaluator<EmpathyFeedback>;
pub type HumorEvaluator = AxisEvaluator<HumorFeedback>;

/// Scores one axis, either through the configured generator or the axis
/// heuristics. The mode never changes after construction.
#[derive(Debug, Clone)]
pub struct AxisEvaluator<F: AxisFeedback> {
    descriptor: &'static AxisDescriptor<F>,
    mode: GenerationMode,
}

impl<F: AxisFeedback> AxisEvaluator<F> {
    pub fn new(descriptor: &'static AxisDescriptor<F>, mode: GenerationMode) -> Self {
        Self { descriptor, mode }
    }

    pub fn axis(&self) -> Axis {
        self.descriptor.axis
    }

    pub fn reviewer(&self) -> &'static str {
        self.descriptor.reviewer
    }

    pub fn mode(&self) -> &GenerationMode {
        &self.mode
    }

    pub async fn evaluate(
        &self,
        product: &str,
        raw_script: &str,
        rules: &RulesConfig,
    ) -> Result<F, ReviewError> {
        let axis = self.descriptor.axis;
        let stage = ReviewStage::Evaluation(axis);

        let feedback = match &self.mode {
            GenerationMode::Heuristic => {
                debug!(%axis, reviewer = self.descriptor.reviewer, "scoring with heuristics");
                self.descriptor.run_heuristic(raw_script, rules)
            }
            GenerationMode::Remote(generator) => {
                debug!(%axis, reviewer = self.descriptor.reviewer, "requesting remote review");
                let request = GenerationRequest {
                    system: REVIEWER_SYSTEM_INSTRUCTION.to_string(),
                    prompt: evaluation_prompt(self.descriptor, product, raw_script, rules),
                    temperature: TEMPERATURE,
                    max_tokens: self.descriptor.max_tokens,
                };

                let content = generator.generate(request).await.map_err(|err| {
                    warn!(%axis, error = %err, "remote review failed");
                    ReviewError::from_generation(stage, err)
                })?;

                parse_feedback::<F>(&content).map_err(|detail| {
                    warn!(%axis, %detail, "remote review payload rejected");
                    ReviewError::MalformedPayload { stage, detail }
                })?
            }
        };

        Ok(feedback.clamped())
    }
}

impl AxisEvaluator<ComfortFeedback> {
    pub fn comfort(mode: GenerationMode) -> Self {
        Self::new(&COMFORT_AXIS, mode)
    }
}

impl AxisEvaluator<EmpathyFeedback> {
    pub fn empathy(mode: GenerationMode) -> Self {
        Self::new(&EMPATHY_AXIS, mode)
    }
}

impl AxisEvaluator<HumorFeedback> {
    pub fn humor(mode: GenerationMode) -> Self {
        Self::new(&HUMOR_AXIS, mode)
    }
}

/// Decodes a structured review, tolerating a surrounding Markdown code fence.
pub(crate) fn parse_feedback<F: DeserializeOwned>(content: &str) -> Result<F, String> {
    serde_json::from_str(strip_code_fence(content)).map_err(|err| err.to_string())
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);

    // Drop an info string such as `json` on the opening fence line.
    match inner.split_once('\n') {
        Some((info, body)) if !info.trim_start().starts_with('{') => body.trim(),
        _ => inner.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fenced_json_with_info_string() {
        let content = "```json\n{\"comfort_score\": 8}\n```";
        assert_eq!(strip_code_fence(content), "{\"comfort_score\": 8}");
    }

    #[test]
    fn leaves_bare_json_untouched() {
        assert_eq!(strip_code_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn fractional_scores_are_rounded_on_parse() {
        let feedback: HumorFeedback = parse_feedback(
            r#"{"humor_score": 6.6, "problematic_humor": "none", "alternative_punchline": "no changes needed", "reasoning": "ok"}"#,
        )
        .expect("valid payload");
        assert_eq!(feedback.score, 7);
    }

    #[test]
    fn missing_fields_are_rejected() {
        let result: Result<EmpathyFeedback, _> =
            parse_feedback(r#"{"empathy_score": 9, "edit_1": "a"}"#);
        assert!(result.is_err());
    }
}
