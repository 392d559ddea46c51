//! Relay adapter: completion through a user-deployed relay script
//!
//! The relay (a Google Apps Script deployment or compatible) holds the
//! provider key server-side; the stored script id is the only routing
//! credential and travels in the URL, not in a header.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ai::provider::{
    api_error, extract_completion, AiError, ChatResponse, Choice, CompletionProvider, ErrorField,
};
use crate::prompt::TaskKind;

pub struct RelayProvider {
    client: Client,
    base_url: String,
    script_id: String,
}

impl RelayProvider {
    pub fn new(base_url: impl Into<String>, script_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            script_id: script_id.into(),
        }
    }

    fn exec_url(&self) -> String {
        format!(
            "{}/{}/exec",
            self.base_url.trim_end_matches('/'),
            self.script_id
        )
    }
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    prompt: &'a str,
    endpoint: TaskKind,
}

/// Everything a relay script may answer with. Decoded explicitly so a
/// reply that carries none of the known fields is a typed error instead
/// of a placeholder string.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RelayReply {
    error: Option<ErrorField>,
    result: Option<String>,
    choices: Option<Vec<Choice>>,
}

fn extract_reply(reply: RelayReply) -> Result<String, AiError> {
    if let Some(error) = reply.error {
        return Err(AiError::Script(error.into_message()));
    }
    // `result` takes precedence over a pass-through `choices` payload
    if let Some(result) = reply.result {
        return Ok(result);
    }
    match reply.choices {
        Some(choices) => extract_completion(ChatResponse { choices }),
        None => Err(AiError::MissingCompletion),
    }
}

#[async_trait]
impl CompletionProvider for RelayProvider {
    async fn complete(&self, prompt: &str, task: TaskKind) -> Result<String, AiError> {
        if self.script_id.is_empty() {
            return Err(AiError::MissingCredential);
        }

        let request = RelayRequest {
            prompt,
            endpoint: task,
        };

        let response = self
            .client
            .post(self.exec_url())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let reply: RelayReply = response.json().await?;
        extract_reply(reply)
    }
}
