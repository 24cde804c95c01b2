//! AI features: channel persona analysis and reply drafting
//!
//! Uses the Gemini API with Google Search grounding:
//! - `analyze_channel_profile` turns a channel URL/handle/name into a persona
//! - `generate_reply` drafts a reply to a viewer comment in that persona's voice

mod actor;
mod client;
mod parser;
mod prompts;
mod service;

pub use actor::{AiActorHandle, AiCommand, AiEvent, spawn_ai_actor};
pub use client::GeminiClient;
pub use parser::split_keywords;
pub use service::{Temperatures, analyze_channel_profile};
