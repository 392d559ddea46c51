//! Generation pipeline: validate input, render the prompt, call the adapter

use thiserror::Error;

use crate::ai::{AiError, CompletionProvider};
use crate::config::AppConfig;
use crate::prompt::{PromptError, TaskKind};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("description must not be empty")]
    EmptyInput,
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Completion(#[from] AiError),
}

/// Run one request/response cycle for `task`.
///
/// Disabled features and empty input are rejected before any network
/// call is made.
pub async fn generate(
    config: &AppConfig,
    provider: &dyn CompletionProvider,
    task: TaskKind,
    user_text: &str,
) -> Result<String, GenerateError> {
    let user_text = user_text.trim();
    if user_text.is_empty() {
        return Err(GenerateError::EmptyInput);
    }

    let prompt = config.features.render(task, user_text)?;
    Ok(provider.complete(&prompt, task).await?)
}
