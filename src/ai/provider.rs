//! Completion provider abstraction shared by the direct and relay adapters

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ApiConfig;
use crate::prompt::TaskKind;

#[derive(Error, Debug)]
pub enum AiError {
    /// No credential was saved for the selected backend.
    #[error("no credential configured; save an API key or script id first")]
    MissingCredential,
    /// The HTTP transport failed before a response arrived.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },
    /// The relay script reported an error in an otherwise successful reply.
    #[error("{0}")]
    Script(String),
    /// The response arrived but carried no completion text.
    #[error("no response from the API")]
    MissingCompletion,
}

/// Generation parameters resolved from the configuration document.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationParams {
    pub fn from_config(api: &ApiConfig) -> Self {
        Self {
            model: api.default_model.clone(),
            max_tokens: api.max_tokens,
            temperature: api.temperature,
        }
    }
}

/// One completion call against a remote backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send a single, non-retried request and return the generated text.
    async fn complete(&self, prompt: &str, task: TaskKind) -> Result<String, AiError>;
}

// --- Wire shapes shared by both adapters ---

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ChatMessage {
    #[serde(default)]
    pub(crate) role: String,
    pub(crate) content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub(crate) message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub(crate) choices: Vec<Choice>,
}

/// First completion choice's text, trimmed of surrounding whitespace.
pub(crate) fn extract_completion(response: ChatResponse) -> Result<String, AiError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .map(|message| message.content.trim().to_string())
        .ok_or(AiError::MissingCompletion)
}

/// Error payloads come in two shapes: `{"error": {"message": "..."}}` and
/// `{"error": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: ErrorField,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ErrorField {
    Detailed { message: String },
    Plain(String),
}

impl ErrorField {
    pub(crate) fn into_message(self) -> String {
        match self {
            ErrorField::Detailed { message } => message,
            ErrorField::Plain(message) => message,
        }
    }
}

/// Best available message for a non-success response: the body's error
/// field when present, else `HTTP {status}`.
pub(crate) fn api_error(status: u16, body: &str) -> AiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|body| body.error.into_message())
        .unwrap_or_else(|_| format!("HTTP {status}"));
    AiError::Api { status, message }
}
