//! Direct adapter for OpenAI-style chat completion APIs

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::ai::profiles::{API_KEY_PLACEHOLDER, ProviderProfile};
use crate::ai::provider::{
    api_error, extract_completion, AiError, ChatMessage, ChatResponse, CompletionProvider,
    GenerationParams,
};
use crate::prompt::TaskKind;

/// Calls a provider's chat endpoint directly with the user's own API key.
pub struct DirectProvider {
    client: Client,
    profile: ProviderProfile,
    params: GenerationParams,
    api_key: String,
}

impl DirectProvider {
    pub fn new(
        profile: ProviderProfile,
        params: GenerationParams,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            profile,
            params,
            api_key: api_key.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[async_trait]
impl CompletionProvider for DirectProvider {
    async fn complete(&self, prompt: &str, _task: TaskKind) -> Result<String, AiError> {
        if self.api_key.is_empty() {
            return Err(AiError::MissingCredential);
        }

        let request = ChatRequest {
            model: self.params.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: self.params.max_tokens,
            temperature: self.params.temperature,
        };

        let mut call = self.client.post(&self.profile.chat_url);
        for (name, value) in &self.profile.headers {
            call = call.header(name.as_str(), value.replace(API_KEY_PLACEHOLDER, &self.api_key));
        }

        let response = call.json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let response: ChatResponse = response.json().await?;
        extract_completion(response)
    }
}
