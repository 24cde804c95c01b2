//! Application-wide constants for tuning and configuration
//!
//! Centralizes magic numbers to make them discoverable and configurable.

/// Error message display duration in seconds before auto-dismiss.
pub const ERROR_TTL_SECS: u64 = 5;

/// Spinner animation frame duration in milliseconds.
pub const SPINNER_FRAME_MS: u128 = 80;

/// Input poll timeout while a remote call is outstanding (keeps the spinner moving).
pub const POLL_BUSY_MS: u64 = 50;

/// Input poll timeout when idle.
pub const POLL_IDLE_MS: u64 = 150;

/// Model used when the config does not name one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Base URL of the Gemini REST API.
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Sampling temperature for channel analysis.
pub const ANALYSIS_TEMPERATURE: f32 = 0.5;

/// Sampling temperature for reply generation.
pub const REPLY_TEMPERATURE: f32 = 0.7;

/// Returned when the model answers without any text.
pub const FALLBACK_REPLY: &str = "Could not generate a reply.";

/// Author shown for the "new" draft when the author field is blank.
pub const DEFAULT_AUTHOR: &str = "Viewer";

/// Client id value shipped in sample configs; treated as "not configured".
pub const CLIENT_ID_PLACEHOLDER: &str = "YOUR_CLIENT_ID_HERE";

/// Seconds to wait for the browser to hit the OAuth loopback redirect.
pub const OAUTH_CALLBACK_TIMEOUT_SECS: u64 = 120;

/// How long one loopback connection may stay silent before it is dropped.
pub const OAUTH_CALLBACK_READ_TIMEOUT_SECS: u64 = 5;

/// HTTP timeout for OAuth token and profile requests.
pub const OAUTH_HTTP_TIMEOUT_SECS: u64 = 30;

// === UI Constants ===

/// Width of the persona pane as a percentage of the terminal.
pub const PERSONA_PANE_PERCENT: u16 = 30;

/// Width of the session list pane as a percentage of the terminal.
pub const INBOX_PANE_PERCENT: u16 = 28;

/// Below this width only the active pane is drawn.
pub const MIN_THREE_PANE_WIDTH: u16 = 100;
