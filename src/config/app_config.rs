//! Application config document with built-in fallback
//!
//! The document is JSON-shaped and usually hosted next to the team's other
//! QA assets. Fetching it can always fail (offline, moved, malformed), so
//! every failure path degrades to the built-in defaults instead of
//! surfacing an error.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

use crate::prompt::{PromptTemplate, TaskFeature, TaskKind, TaskTemplates};

/// Where the configuration document comes from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    Url(String),
    File(PathBuf),
}

impl ConfigSource {
    /// Interpret a raw CLI argument as a URL or a file path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            ConfigSource::Url(raw.to_string())
        } else {
            ConfigSource::File(PathBuf::from(raw))
        }
    }
}

/// Provider and generation defaults from the document's `apiConfig` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiConfig {
    pub default_provider: String,
    pub default_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_provider: "openai".to_string(),
            default_model: "gpt-3.5-turbo".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

/// The resolved application configuration, valid by construction.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub features: TaskTemplates,
}

// Raw wire shape of the document. Converted to `AppConfig` after decoding
// so template invariants are checked in one place.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Document {
    #[serde(rename = "apiConfig")]
    api_config: ApiConfig,
    features: DocumentFeatures,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DocumentFeatures {
    testcase: Option<DocumentFeature>,
    bugreport: Option<DocumentFeature>,
}

#[derive(Debug, Deserialize)]
struct DocumentFeature {
    enabled: Option<bool>,
    #[serde(rename = "promptTemplate")]
    prompt_template: Option<String>,
}

impl AppConfig {
    /// Fetch and decode the configuration document.
    ///
    /// Never fails: an absent source, an unreachable endpoint, or a
    /// malformed document all fall back to the built-in defaults with a
    /// warning.
    pub async fn fetch(client: &reqwest::Client, source: Option<&ConfigSource>) -> Self {
        let Some(source) = source else {
            return Self::default();
        };
        match Self::try_fetch(client, source).await {
            Ok(config) => config,
            Err(err) => {
                warn!("failed to load configuration document, using defaults: {err:#}");
                Self::default()
            }
        }
    }

    async fn try_fetch(client: &reqwest::Client, source: &ConfigSource) -> anyhow::Result<Self> {
        let body = match source {
            ConfigSource::Url(url) => {
                client
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?
            }
            ConfigSource::File(path) => tokio::fs::read_to_string(path).await?,
        };
        let document: Document = serde_json::from_str(&body)?;
        Ok(Self::from_document(document))
    }

    fn from_document(document: Document) -> Self {
        Self {
            api: document.api_config,
            features: TaskTemplates {
                testcase: resolve_feature(TaskKind::TestCase, document.features.testcase),
                bugreport: resolve_feature(TaskKind::BugReport, document.features.bugreport),
            },
        }
    }
}

/// Merge one document feature entry over the built-in defaults.
///
/// A template that breaks the single-placeholder invariant is rejected
/// here, at load time, so user input can never be silently dropped later.
fn resolve_feature(task: TaskKind, raw: Option<DocumentFeature>) -> TaskFeature {
    let mut feature = TaskFeature::builtin(task);
    let Some(raw) = raw else {
        return feature;
    };
    if let Some(enabled) = raw.enabled {
        feature.enabled = enabled;
    }
    if let Some(text) = raw.prompt_template {
        match PromptTemplate::new(text) {
            Ok(template) => feature.template = template,
            Err(err) => warn!("ignoring {task} template from configuration: {err}"),
        }
    }
    feature
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_DOCUMENT: &str = r#"{
        "apiConfig": {
            "defaultProvider": "anthropic",
            "defaultModel": "claude-3-haiku",
            "maxTokens": 512,
            "temperature": 0.2
        },
        "features": {
            "testcase": {
                "enabled": false,
                "promptTemplate": "Cases for: {prompt}"
            },
            "bugreport": {
                "enabled": true
            }
        }
    }"#;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.default_provider, "openai");
        assert_eq!(config.api.default_model, "gpt-3.5-turbo");
        assert_eq!(config.api.max_tokens, 1000);
        assert_eq!(config.api.temperature, 0.7);
        assert!(config.features.testcase.enabled);
        assert!(config.features.bugreport.enabled);
    }

    #[test]
    fn test_decode_full_document() {
        let document: Document = serde_json::from_str(SAMPLE_DOCUMENT).unwrap();
        let config = AppConfig::from_document(document);

        assert_eq!(config.api.default_provider, "anthropic");
        assert_eq!(config.api.default_model, "claude-3-haiku");
        assert_eq!(config.api.max_tokens, 512);
        assert!(!config.features.testcase.enabled);
        assert_eq!(config.features.testcase.template.as_str(), "Cases for: {prompt}");
        // bugreport entry had no template, keeps the built-in one
        assert!(config.features.bugreport.enabled);
        assert_eq!(
            config.features.bugreport.template.as_str(),
            TaskFeature::builtin(TaskKind::BugReport).template.as_str()
        );
    }

    #[test]
    fn test_decode_partial_document_uses_defaults() {
        let document: Document =
            serde_json::from_str(r#"{"apiConfig": {"maxTokens": 64}}"#).unwrap();
        let config = AppConfig::from_document(document);

        assert_eq!(config.api.max_tokens, 64);
        assert_eq!(config.api.default_provider, "openai");
        assert!(config.features.testcase.enabled);
    }

    #[test]
    fn test_invalid_template_falls_back_to_builtin() {
        let json = r#"{
            "features": {
                "testcase": { "promptTemplate": "no placeholder at all" }
            }
        }"#;
        let document: Document = serde_json::from_str(json).unwrap();
        let config = AppConfig::from_document(document);

        assert_eq!(
            config.features.testcase.template.as_str(),
            TaskFeature::builtin(TaskKind::TestCase).template.as_str()
        );
    }

    #[tokio::test]
    async fn test_fetch_missing_file_degrades_to_defaults() {
        let client = reqwest::Client::new();
        let source = ConfigSource::File(PathBuf::from("/nonexistent/config.json"));

        let config = AppConfig::fetch(&client, Some(&source)).await;
        assert!(config.features.testcase.enabled);
        assert_eq!(config.api.default_provider, "openai");
    }

    #[tokio::test]
    async fn test_fetch_malformed_document_degrades_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{ not json").unwrap();

        let client = reqwest::Client::new();
        let source = ConfigSource::File(file.path().to_path_buf());

        let config = AppConfig::fetch(&client, Some(&source)).await;
        assert!(config.features.testcase.enabled);
    }

    #[tokio::test]
    async fn test_fetch_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE_DOCUMENT).unwrap();

        let client = reqwest::Client::new();
        let source = ConfigSource::File(file.path().to_path_buf());

        let config = AppConfig::fetch(&client, Some(&source)).await;
        assert_eq!(config.api.default_model, "claude-3-haiku");
    }

    #[test]
    fn test_source_parse() {
        assert!(matches!(
            ConfigSource::parse("https://example.com/config.json"),
            ConfigSource::Url(_)
        ));
        assert!(matches!(
            ConfigSource::parse("./config.json"),
            ConfigSource::File(_)
        ));
    }
}
