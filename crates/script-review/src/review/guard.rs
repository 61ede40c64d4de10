use std::sync::Arc;

use serde_json::Value;

use super::domain::{EvaluationRequest, RuleOverrides, RulesConfig, ScriptSubmission};
use super::error::ValidationError;
use crate::config::ReviewDefaults;

/// Guard responsible for producing `EvaluationRequest` instances.
#[derive(Debug, Clone)]
pub struct RequestGuard {
    defaults: Arc<ReviewDefaults>,
}

impl RequestGuard {
    pub fn new(defaults: Arc<ReviewDefaults>) -> Self {
        Self { defaults }
    }

    /// Checks field presence and types, then resolves the rules against the
    /// injected defaults.
    pub fn request_from_submission(
        &self,
        submission: ScriptSubmission,
    ) -> Result<EvaluationRequest, ValidationError> {
        let ScriptSubmission {
            product,
            raw_script,
            rules,
            config: _,
        } = submission;

        let product = non_empty_text(product).ok_or(ValidationError::MissingProduct)?;
        let raw_script = non_empty_text(raw_script).ok_or(ValidationError::MissingRawScript)?;

        let rules = match rules {
            Some(value @ Value::Object(_)) => value,
            _ => return Err(ValidationError::MissingRules),
        };
        let overrides: RuleOverrides = serde_json::from_value(rules)
            .map_err(|err| ValidationError::MalformedRules(err.to_string()))?;

        if let Some(threshold) = &overrides.threshold {
            if let Some((axis, value)) = threshold
                .supplied()
                .find(|(_, value)| !(1..=10).contains(value))
            {
                return Err(ValidationError::ThresholdOutOfRange { axis, value });
            }
        }

        Ok(EvaluationRequest {
            product,
            raw_script,
            rules: RulesConfig::resolve(&overrides, &self.defaults),
        })
    }
}

fn non_empty_text(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
        _ => None,
    }
}
