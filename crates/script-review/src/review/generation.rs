use std::fmt::{self, Debug};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GenerationConfig;

/// One chat-style call: a fixed system instruction plus the stage prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("generator transport failed: {0}")]
    Transport(String),
    #[error("generator responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("generator response carried no message content")]
    MissingContent,
    #[error("generator response could not be decoded: {0}")]
    Decode(String),
    #[error("generator client could not be built: {0}")]
    Client(String),
}

/// Remote text-generation capability. Implementations return the raw
/// assistant message text.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

/// Whether a stage delegates to a generator or runs its local rules. Fixed when
/// the stage is constructed.
#[derive(Debug, Clone)]
pub enum GenerationMode {
    Remote(Arc<dyn TextGenerator>),
    Heuristic,
}

impl GenerationMode {
    pub fn from_generator(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        match generator {
            Some(generator) => GenerationMode::Remote(generator),
            None => GenerationMode::Heuristic,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, GenerationMode::Remote(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            GenerationMode::Remote(_) => "remote",
            GenerationMode::Heuristic => "heuristic",
        }
    }
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiChatClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiChatClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| GenerationError::Client(err.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl Debug for OpenAiChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiChatClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TextGenerator for OpenAiChatClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = ChatCompletionRequest::new(&self.model, request);
        debug!(model = %self.model, max_tokens = body.max_tokens, "sending chat completion");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;
        extract_message_content(&text)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

impl ChatCompletionRequest {
    fn new(model: &str, request: GenerationRequest) -> Self {
        let GenerationRequest {
            system,
            prompt,
            temperature,
            max_tokens,
        } = request;

        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            temperature,
            max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

fn extract_message_content(body: &str) -> Result<String, GenerationError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|err| GenerationError::Decode(err.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(GenerationError::MissingContent)
}
