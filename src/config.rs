use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::constants::{
    ANALYSIS_TEMPERATURE, CLIENT_ID_PLACEHOLDER, DEFAULT_MODEL, GEMINI_API_URL, REPLY_TEMPERATURE,
};

const ENV_API_KEY: &str = "TUBEREPLY_API_KEY";
const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
const ENV_CLIENT_ID: &str = "TUBEREPLY_OAUTH_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "TUBEREPLY_OAUTH_CLIENT_SECRET";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Generative-language API settings
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Google sign-in settings
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key (required; the app refuses to start its main view without it)
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Override for the REST endpoint (tests, proxies)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_analysis_temperature")]
    pub analysis_temperature: f32,
    #[serde(default = "default_reply_temperature")]
    pub reply_temperature: f32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            analysis_temperature: default_analysis_temperature(),
            reply_temperature: default_reply_temperature(),
        }
    }
}

impl GeminiConfig {
    /// API key from the environment or config file, ignoring blank values
    pub fn get_api_key(&self) -> Option<String> {
        env_non_empty(ENV_API_KEY)
            .or_else(|| env_non_empty(ENV_GEMINI_API_KEY))
            .or_else(|| non_empty(self.api_key.clone()))
    }
}

/// Google OAuth2 client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub client_id: Option<String>,
    /// Only needed for client types that require it
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// Whether sign-in can be offered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientIdStatus {
    Configured(String),
    Missing,
    Placeholder,
}

impl AuthConfig {
    pub fn client_id_status(&self) -> ClientIdStatus {
        Self::classify(env_non_empty(ENV_CLIENT_ID).or_else(|| self.client_id.clone()))
    }

    pub fn get_client_secret(&self) -> Option<String> {
        env_non_empty(ENV_CLIENT_SECRET).or_else(|| non_empty(self.client_secret.clone()))
    }

    fn classify(client_id: Option<String>) -> ClientIdStatus {
        match non_empty(client_id) {
            None => ClientIdStatus::Missing,
            Some(id) if id == CLIENT_ID_PLACEHOLDER => ClientIdStatus::Placeholder,
            Some(id) => ClientIdStatus::Configured(id),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: ThemeVariant,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeVariant {
    /// Catppuccin Mocha palette with rounded borders
    #[default]
    Modern,
    /// Terminal's own 16 colors
    Dark,
    HighContrast,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    GEMINI_API_URL.to_string()
}

fn default_analysis_temperature() -> f32 {
    ANALYSIS_TEMPERATURE
}

fn default_reply_temperature() -> f32 {
    REPLY_TEMPERATURE
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_non_empty(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("tubereply");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the config file; a missing file yields defaults so that
    /// environment variables alone are enough to run.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::info!(
                "No config file at {}, using defaults and environment",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(Self::config_dir()?)?;
        Ok(())
    }
}
