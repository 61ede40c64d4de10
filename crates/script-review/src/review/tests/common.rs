use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::ReviewDefaults;
use crate::review::domain::{RulesConfig, ScriptSubmission};
use crate::review::generation::{GenerationError, GenerationRequest, TextGenerator};
use crate::review::prompts::REFINER_SYSTEM_INSTRUCTION;
use crate::review::service::ScriptReviewService;

pub(super) const PRODUCT: &str = "DermaFlow Pro - Eczema Treatment";

pub(super) const HARSH_SCRIPT: &str = "Hey everyone! Do you suffer from that gross, itchy condition that makes you look disgusting? Yeah, I'm talking about eczema—it's the worst. Well, jokes on you because we have the solution! DermaFlow Pro is the miracle product you've been waiting for. Just slap it on and boom, your skin problems are gone. Don't be a loser and suffer anymore. Try DermaFlow Pro today and actually have a life worth living!";

pub(super) const GENTLE_SCRIPT: &str = "We understand how hard this can feel. Our team is here to support you on your journey to calmer skin.";

pub(super) fn default_rules() -> RulesConfig {
    RulesConfig::default()
}

pub(super) fn rules_json() -> Value {
    json!({
        "threshold": { "comfort": 7, "empathy": 8, "humor": 7 },
        "forbiddenTones": ["dismissive", "condescending", "insensitive", "mocking"]
    })
}

pub(super) fn submission(raw_script: &str, rules: Value) -> ScriptSubmission {
    ScriptSubmission {
        product: Some(Value::String(PRODUCT.to_string())),
        raw_script: Some(Value::String(raw_script.to_string())),
        rules: Some(rules),
        config: None,
    }
}

pub(super) fn heuristic_service() -> ScriptReviewService {
    ScriptReviewService::heuristic(ReviewDefaults::standard())
}

pub(super) fn remote_service(generator: Arc<ScriptedGenerator>) -> ScriptReviewService {
    let generator: Arc<dyn TextGenerator> = generator;
    ScriptReviewService::new(ReviewDefaults::standard(), Some(generator))
}

/// Canned payloads keyed by the reviewer perspective named in the prompt.
#[derive(Debug, Clone)]
pub(super) struct ScriptedResponses {
    pub comfort: Result<String, GenerationError>,
    pub empathy: Result<String, GenerationError>,
    pub humor: Result<String, GenerationError>,
    pub refined: Result<String, GenerationError>,
}

impl Default for ScriptedResponses {
    fn default() -> Self {
        Self {
            comfort: Ok(json!({
                "comfort_score": 8,
                "most_uncomfortable_line": "the worst",
                "replacement_line": "really tough",
                "reasoning": "Mostly comfortable."
            })
            .to_string()),
            empathy: Ok(json!({
                "empathy_score": 9,
                "edit_1": "Acknowledge the itch.",
                "edit_2": "Mention the community.",
                "reasoning": "Warm overall."
            })
            .to_string()),
            humor: Ok(json!({
                "humor_score": 8,
                "problematic_humor": "none",
                "alternative_punchline": "no changes needed",
                "reasoning": "Balanced."
            })
            .to_string()),
            refined: Ok("  A kinder script.\n".to_string()),
        }
    }
}

/// In-memory generator recording every request it receives.
#[derive(Debug, Default)]
pub(super) struct ScriptedGenerator {
    responses: ScriptedResponses,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub(super) fn new(responses: ScriptedResponses) -> Arc<Self> {
        Arc::new(Self {
            responses,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(super) fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }

    pub(super) fn call_count(&self) -> usize {
        self.requests.lock().expect("requests mutex poisoned").len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let response = if request.system == REFINER_SYSTEM_INSTRUCTION {
            self.responses.refined.clone()
        } else if request.prompt.contains("an embarrassed consumer") {
            self.responses.comfort.clone()
        } else if request.prompt.contains("an empathic friend") {
            self.responses.empathy.clone()
        } else {
            self.responses.humor.clone()
        };

        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(request);
        response
    }
}
