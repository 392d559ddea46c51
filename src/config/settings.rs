//! Local settings loaded from the config file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Which completion backend handles generation calls
    #[serde(default)]
    pub backend: BackendSettings,
    /// Where the application config document comes from
    #[serde(default)]
    pub document: DocumentSettings,
}

/// Completion backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// `direct` calls the provider API itself, `relay` goes through a
    /// user-deployed relay script
    #[serde(default)]
    pub mode: BackendMode,
    /// Base URL the relay adapter prepends to the stored script id
    #[serde(default = "default_relay_base_url")]
    pub relay_base_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    #[default]
    Direct,
    Relay,
}

fn default_relay_base_url() -> String {
    "https://script.google.com/macros/s".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            mode: BackendMode::default(),
            relay_base_url: default_relay_base_url(),
        }
    }
}

/// Source of the application config document (none means built-in defaults)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentSettings {
    /// URL to fetch the document from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Local file used when no URL is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the default location
    ///
    /// Looks for the file at:
    /// 1. ~/.config/qa-assistant/config.toml
    /// 2. Creates default settings if not found
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            // Create default settings
            let settings = Self::default();
            settings.save_to_path(&config_path)?;
            tracing::info!("Created default settings at {:?}", config_path);
            Ok(settings)
        }
    }

    /// Load settings from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))
    }

    /// Save settings to a specific path
    pub fn save_to_path(&self, path: &PathBuf) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory: {:?}", parent))?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize settings")?;

        std::fs::write(path, &contents)
            .with_context(|| format!("Failed to write settings file: {:?}", path))?;

        Ok(())
    }

    /// Get the default settings file path
    ///
    /// Priority:
    /// 1. $XDG_CONFIG_HOME/qa-assistant/config.toml
    /// 2. ~/.config/qa-assistant/config.toml
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            Ok(PathBuf::from(xdg_config).join("qa-assistant").join("config.toml"))
        } else {
            let home = dirs::home_dir()
                .context("Could not determine home directory")?;
            Ok(home.join(".config").join("qa-assistant").join("config.toml"))
        }
    }
}
