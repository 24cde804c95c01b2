//! Error taxonomy surfaced to the user
//!
//! Plumbing (config files, terminal, HTTP client setup) uses `anyhow`.
//! Failures that reach the user are mapped into one of these variants,
//! each carrying the message shown in the error bar.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplyError {
    /// Missing API key, missing or placeholder OAuth client id
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    Analysis(String),
    #[error("{0}")]
    Generation(String),
    /// Token or profile fetch failure
    #[error("{0}")]
    Auth(String),
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
}

impl ReplyError {
    pub fn analysis_failed() -> Self {
        Self::Analysis(
            "Failed to analyze channel. Please try entering details manually.".to_string(),
        )
    }

    pub fn generation_failed() -> Self {
        Self::Generation(
            "Failed to generate reply. Please check your connection and API key.".to_string(),
        )
    }

    pub fn auth_setup_required() -> Self {
        Self::Config(
            "Authentication setup required: set auth.client_id in config.toml \
             or TUBEREPLY_OAUTH_CLIENT_ID"
                .to_string(),
        )
    }
}
