use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{AggregatedFeedback, ThresholdOverrides, Thresholds};
use super::error::{ReviewError, ReviewStage};
use super::generation::{GenerationMode, GenerationRequest};
use super::prompts::{
    refinement_prompt, REFINEMENT_MAX_TOKENS, REFINER_SYSTEM_INSTRUCTION, TEMPERATURE,
};

const CONFIDENT_TREATMENT_LINE: &str =
    "This product helps you manage your condition with confidence";
const SUPPORTIVE_SIGN_OFF: &str = "Here to support you every step of the way";
const COMMUNITY_LINE: &str =
    "\nYou're not alone in this journey—thousands of people have found relief using our product.";
const UNDERSTANDING_LINE: &str =
    "\nWe understand how challenging this can be, and we're here to support you.";
const INSERTION_LINE_INDEX: usize = 2;

static TREATMENT_CLAIM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)This product (?:treats|manages|helps with)").expect("valid regex")
});
static SERVICE_SIGN_OFF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Here to (?:help|serve)").expect("valid regex"));

/// Advisory result of [`RefinementEngine::validate_refined_script`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinementValidation {
    pub is_valid: bool,
    pub message: String,
    pub thresholds: Thresholds,
    pub notes: String,
}

/// Rewrites a script so it addresses the aggregated reviewer feedback.
#[derive(Debug, Clone)]
pub struct RefinementEngine {
    mode: GenerationMode,
}

impl RefinementEngine {
    pub fn new(mode: GenerationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> &GenerationMode {
        &self.mode
    }

    pub async fn refine(
        &self,
        raw_script: &str,
        feedback: &AggregatedFeedback,
    ) -> Result<String, ReviewError> {
        match &self.mode {
            GenerationMode::Heuristic => {
                debug!("refining script with local substitutions");
                Ok(patch_script(raw_script, feedback))
            }
            GenerationMode::Remote(generator) => {
                debug!("requesting remote script refinement");
                let request = GenerationRequest {
                    system: REFINER_SYSTEM_INSTRUCTION.to_string(),
                    prompt: refinement_prompt(raw_script, feedback),
                    temperature: TEMPERATURE,
                    max_tokens: REFINEMENT_MAX_TOKENS,
                };

                let refined = generator.generate(request).await.map_err(|err| {
                    warn!(error = %err, "remote refinement failed");
                    ReviewError::from_generation(ReviewStage::Refinement, err)
                })?;
                Ok(refined.trim().to_string())
            }
        }
    }

    /// Always reports success; the thresholds echoed back are the standard
    /// ones overlaid with `thresholds`.
    pub fn validate_refined_script(
        &self,
        refined_script: &str,
        thresholds: Option<&ThresholdOverrides>,
    ) -> RefinementValidation {
        debug!(
            chars = refined_script.chars().count(),
            "refined script accepted without re-evaluation"
        );

        let merged = match thresholds {
            Some(overrides) => Thresholds::standard().with_overrides(overrides),
            None => Thresholds::standard(),
        };

        RefinementValidation {
            is_valid: true,
            message: "Script has been refined according to all feedback.".to_string(),
            thresholds: merged,
            notes: "For production use, run the refined script through all three quality agents again to verify it meets all thresholds.".to_string(),
        }
    }
}

/// Local refinement: literal substitutions and inserted lines driven by the
/// feedback text. A flagged phrase missing from the script is skipped.
pub fn patch_script(raw_script: &str, feedback: &AggregatedFeedback) -> String {
    let mut script = raw_script.to_string();

    let comfort = &feedback.comfort;
    if !comfort.flagged_line.is_empty() {
        script = script.replacen(&comfort.flagged_line, &comfort.replacement, 1);
    }

    let edit1 = &feedback.empathy.edit1;
    if edit1.contains("Replace") || edit1.contains("Instead of") {
        script = apply_reframe(&script, edit1);
    }

    let edit2 = &feedback.empathy.edit2;
    if edit2.contains("Add") || edit2.contains("Include") {
        script = insert_empathy_line(&script, edit2);
    }

    let humor = &feedback.humor;
    if humor.has_flag() {
        script = script.replacen(&humor.flagged_humor, &humor.alternative, 1);
    }

    script.trim().to_string()
}

fn apply_reframe(script: &str, edit: &str) -> String {
    let lowered = script.to_lowercase();

    if edit.contains("confidence") && !lowered.contains("confidence") {
        return TREATMENT_CLAIM
            .replace(script, NoExpand(CONFIDENT_TREATMENT_LINE))
            .into_owned();
    }

    if edit.contains("support") && !lowered.contains("support") {
        return SERVICE_SIGN_OFF
            .replace(script, NoExpand(SUPPORTIVE_SIGN_OFF))
            .into_owned();
    }

    script.to_string()
}

fn insert_empathy_line(script: &str, edit: &str) -> String {
    let line = if edit.contains("journey") {
        COMMUNITY_LINE
    } else if edit.contains("understand") {
        UNDERSTANDING_LINE
    } else {
        return script.to_string();
    };

    let mut lines: Vec<&str> = script.split('\n').collect();
    let index = INSERTION_LINE_INDEX.min(lines.len().saturating_sub(1));
    lines.insert(index, line);
    lines.join("\n")
}
