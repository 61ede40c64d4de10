//! Script review pipeline: request validation, three concurrent axis
//! evaluators, aggregation, refinement, and report assembly.

pub mod axis;
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod generation;
pub(crate) mod guard;
pub(crate) mod heuristics;
pub(crate) mod prompts;
pub mod refinement;
pub mod report;
pub mod service;

#[cfg(test)]
mod tests;

pub use axis::{AxisDescriptor, COMFORT_AXIS, EMPATHY_AXIS, HUMOR_AXIS};
pub use domain::{
    AggregatedFeedback, Axis, AxisFeedback, AxisScores, ComfortFeedback, EmpathyFeedback,
    EvaluationRequest, HumorFeedback, RuleOverrides, RulesConfig, ScriptSubmission,
    ThresholdOverrides, Thresholds, NO_CHANGES_NEEDED, NO_FLAGGED_HUMOR,
};
pub use error::{ReviewError, ReviewStage, ValidationError};
pub use evaluator::{AxisEvaluator, ComfortEvaluator, EmpathyEvaluator, HumorEvaluator};
pub use generation::{
    GenerationError, GenerationMode, GenerationRequest, OpenAiChatClient, TextGenerator,
};
pub use guard::RequestGuard;
pub use refinement::{patch_script, RefinementEngine, RefinementValidation};
pub use report::{
    summarize, AxisEvaluations, EvaluationReport, ReviewStatus, ScoreBand, ScoreCard, ScoreLine,
};
pub use service::ScriptReviewService;
