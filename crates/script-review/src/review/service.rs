use std::sync::Arc;

use tracing::{debug, info, info_span, Instrument};

use super::domain::{
    AggregatedFeedback, ComfortFeedback, EmpathyFeedback, EvaluationRequest, HumorFeedback,
    RulesConfig, ScriptSubmission,
};
use super::error::ReviewError;
use super::evaluator::{ComfortEvaluator, EmpathyEvaluator, HumorEvaluator};
use super::generation::{GenerationError, GenerationMode, OpenAiChatClient, TextGenerator};
use super::guard::RequestGuard;
use super::refinement::RefinementEngine;
use super::report::EvaluationReport;
use crate::config::{AppConfig, ReviewDefaults};

/// Service composing the request guard, the three axis evaluators, and the
/// refinement engine.
#[derive(Debug, Clone)]
pub struct ScriptReviewService {
    guard: RequestGuard,
    comfort: ComfortEvaluator,
    empathy: EmpathyEvaluator,
    humor: HumorEvaluator,
    refinement: RefinementEngine,
    mode: GenerationMode,
}

impl ScriptReviewService {
    /// Remote mode when `generator` is present, heuristic mode otherwise.
    pub fn new(defaults: ReviewDefaults, generator: Option<Arc<dyn TextGenerator>>) -> Self {
        let mode = GenerationMode::from_generator(generator);

        Self {
            guard: RequestGuard::new(Arc::new(defaults)),
            comfort: ComfortEvaluator::comfort(mode.clone()),
            empathy: EmpathyEvaluator::empathy(mode.clone()),
            humor: HumorEvaluator::humor(mode.clone()),
            refinement: RefinementEngine::new(mode.clone()),
            mode,
        }
    }

    pub fn heuristic(defaults: ReviewDefaults) -> Self {
        Self::new(defaults, None)
    }

    /// Builds the OpenAI client when an API key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, GenerationError> {
        let generator = match &config.generation {
            Some(generation) => {
                let client: Arc<dyn TextGenerator> = Arc::new(OpenAiChatClient::new(generation)?);
                Some(client)
            }
            None => None,
        };

        Ok(Self::new(config.defaults.clone(), generator))
    }

    pub fn mode(&self) -> &GenerationMode {
        &self.mode
    }

    pub fn refinement(&self) -> &RefinementEngine {
        &self.refinement
    }

    /// Validate, evaluate all three axes concurrently, refine, and report.
    pub async fn evaluate_script(
        &self,
        submission: ScriptSubmission,
    ) -> Result<EvaluationReport, ReviewError> {
        let request = self.guard.request_from_submission(submission)?;
        self.evaluate_request(&request).await
    }

    pub async fn evaluate_request(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationReport, ReviewError> {
        let span = info_span!(
            "script_review",
            product = %request.product,
            mode = self.mode.label()
        );

        async {
            info!("starting script review");
            let EvaluationRequest {
                product,
                raw_script,
                rules,
            } = request;

            let (comfort, empathy, humor) = tokio::try_join!(
                self.comfort.evaluate(product, raw_script, rules),
                self.empathy.evaluate(product, raw_script, rules),
                self.humor.evaluate(product, raw_script, rules),
            )?;
            debug!(
                comfort = comfort.score,
                empathy = empathy.score,
                humor = humor.score,
                "axis evaluations complete"
            );

            let feedback = AggregatedFeedback::new(comfort, empathy, humor, &rules.thresholds);
            let refined_script = self.refinement.refine(raw_script, &feedback).await?;

            let report = EvaluationReport::assemble(feedback, rules.thresholds, refined_script);
            info!(
                status = %report.status,
                comfort = report.scores.comfort,
                empathy = report.scores.empathy,
                humor = report.scores.humor,
                "script review finished"
            );
            Ok::<_, ReviewError>(report)
        }
        .instrument(span)
        .await
    }

    pub async fn comfort_evaluation(
        &self,
        product: &str,
        raw_script: &str,
        rules: &RulesConfig,
    ) -> Result<ComfortFeedback, ReviewError> {
        self.comfort.evaluate(product, raw_script, rules).await
    }

    pub async fn empathy_evaluation(
        &self,
        product: &str,
        raw_script: &str,
        rules: &RulesConfig,
    ) -> Result<EmpathyFeedback, ReviewError> {
        self.empathy.evaluate(product, raw_script, rules).await
    }

    pub async fn humor_evaluation(
        &self,
        product: &str,
        raw_script: &str,
        rules: &RulesConfig,
    ) -> Result<HumorFeedback, ReviewError> {
        self.humor.evaluate(product, raw_script, rules).await
    }
}
