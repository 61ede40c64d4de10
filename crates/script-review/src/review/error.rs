use std::fmt;

use super::domain::Axis;
use super::generation::GenerationError;

/// Pipeline step that produced a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStage {
    Evaluation(Axis),
    Refinement,
}

impl fmt::Display for ReviewStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewStage::Evaluation(axis) => write!(f, "{axis} evaluation"),
            ReviewStage::Refinement => f.write_str("script refinement"),
        }
    }
}

/// Raised by the request guard before any evaluator runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("request must include \"product\" (non-empty string)")]
    MissingProduct,
    #[error("request must include \"rawScript\" (non-empty string)")]
    MissingRawScript,
    #[error("request must include \"rules\" (object)")]
    MissingRules,
    #[error("request \"rules\" could not be read: {0}")]
    MalformedRules(String),
    #[error("{axis} threshold must be between 1 and 10 (found {value})")]
    ThresholdOutOfRange { axis: Axis, value: u8 },
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{stage} remote call failed: {source}")]
    RemoteCall {
        stage: ReviewStage,
        #[source]
        source: GenerationError,
    },
    #[error("{stage} returned a malformed payload: {detail}")]
    MalformedPayload { stage: ReviewStage, detail: String },
}

impl ReviewError {
    /// Sorts a generator failure into transport-level or payload-level.
    pub(crate) fn from_generation(stage: ReviewStage, error: GenerationError) -> Self {
        match error {
            GenerationError::MissingContent | GenerationError::Decode(_) => {
                ReviewError::MalformedPayload {
                    stage,
                    detail: error.to_string(),
                }
            }
            other => ReviewError::RemoteCall {
                stage,
                source: other,
            },
        }
    }

    pub fn stage(&self) -> Option<ReviewStage> {
        match self {
            ReviewError::Validation(_) => None,
            ReviewError::RemoteCall { stage, .. } | ReviewError::MalformedPayload { stage, .. } => {
                Some(*stage)
            }
        }
    }
}
