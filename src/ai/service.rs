//! Channel analysis and reply generation on top of a [`TextGenerator`]

use super::client::{GenerateRequest, TextGenerator};
use super::parser::parse_channel_profile;
use super::prompts;
use crate::constants::FALLBACK_REPLY;
use crate::error::ReplyError;
use crate::types::{ChannelProfile, CommentData};

/// Sampling settings shared by both calls
#[derive(Debug, Clone, Copy)]
pub struct Temperatures {
    pub analysis: f32,
    pub reply: f32,
}

/// Ask the model to research a channel and parse its labeled answer.
///
/// Any missing label falls back (see [`parse_channel_profile`]); only a
/// transport or API failure is an error.
pub async fn analyze_channel_profile(
    generator: &dyn TextGenerator,
    channel_identifier: &str,
    temperature: f32,
) -> Result<ChannelProfile, ReplyError> {
    let request = GenerateRequest {
        prompt: prompts::channel_analysis_prompt(channel_identifier),
        system_instruction: None,
        grounding: true,
        temperature,
    };

    match generator.generate(&request).await {
        Ok(text) => {
            let text = text.unwrap_or_default();
            tracing::debug!("Channel analysis answer: {} chars", text.len());
            Ok(parse_channel_profile(&text, channel_identifier))
        }
        Err(e) => {
            tracing::error!("Error analyzing channel '{}': {:#}", channel_identifier, e);
            Err(ReplyError::analysis_failed())
        }
    }
}

/// Generate a reply in the persona's voice; the model's text is returned verbatim
pub async fn generate_reply(
    generator: &dyn TextGenerator,
    profile: &ChannelProfile,
    comment: &CommentData,
    temperature: f32,
) -> Result<String, ReplyError> {
    let request = GenerateRequest {
        prompt: prompts::reply_user_prompt(comment),
        system_instruction: Some(prompts::reply_system_instruction(profile)),
        grounding: true,
        temperature,
    };

    match generator.generate(&request).await {
        Ok(Some(text)) => Ok(text),
        Ok(None) => {
            tracing::warn!("Model returned no text for comment {}", comment.id);
            Ok(FALLBACK_REPLY.to_string())
        }
        Err(e) => {
            tracing::error!("Error generating reply: {:#}", e);
            Err(ReplyError::generation_failed())
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{CommentStatus, Tone};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Canned generator that records every request
    pub(crate) struct StubGenerator {
        pub answer: anyhow::Result<Option<String>>,
        pub seen: Mutex<Vec<GenerateRequest>>,
    }

    impl StubGenerator {
        pub(crate) fn answering(text: &str) -> Self {
            Self {
                answer: Ok(Some(text.to_string())),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn empty() -> Self {
            Self {
                answer: Ok(None),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                answer: Err(anyhow::anyhow!("connection refused")),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<Option<String>> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(anyhow::anyhow!("{}", e)),
            }
        }
    }

    fn sam_comment() -> CommentData {
        CommentData {
            id: "new".to_string(),
            author: "Sam".to_string(),
            text: "Great video!".to_string(),
            timestamp: "Now".to_string(),
            video_url: None,
            status: CommentStatus::Pending,
            reply: None,
            sentiment: None,
        }
    }

    fn sarcastic() -> ChannelProfile {
        ChannelProfile {
            tone: Tone::Sarcastic,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_analyze_parses_labeled_lines() {
        let stub = StubGenerator::answering(
            "NAME: My Channel\nDESCRIPTION: Gaming vlogs\nKEYWORDS: fun, loud\nTONE: Hype",
        );
        let profile = analyze_channel_profile(&stub, "mychannel", 0.5)
            .await
            .unwrap();

        assert_eq!(profile.name, "My Channel");
        assert_eq!(profile.description, "Gaming vlogs");
        assert_eq!(profile.style_keywords, vec!["fun", "loud"]);
        assert_eq!(profile.tone, Tone::Hype);

        let seen = stub.seen.lock().unwrap();
        assert!(seen[0].grounding);
        assert_eq!(seen[0].temperature, 0.5);
        assert!(seen[0].system_instruction.is_none());
    }

    #[tokio::test]
    async fn test_analyze_with_no_text_falls_back() {
        let stub = StubGenerator::empty();
        let profile = analyze_channel_profile(&stub, "@someone", 0.5)
            .await
            .unwrap();
        assert_eq!(profile.name, "@someone");
        assert_eq!(profile.tone, Tone::Friendly);
    }

    #[tokio::test]
    async fn test_analyze_failure_is_analysis_error() {
        let stub = StubGenerator::failing();
        let err = analyze_channel_profile(&stub, "x", 0.5).await.unwrap_err();
        assert!(matches!(err, ReplyError::Analysis(_)));
    }

    #[tokio::test]
    async fn test_generate_reply_returns_text_verbatim() {
        let stub = StubGenerator::answering("Oh wow, thanks Sam. Truly groundbreaking praise.");
        let reply = generate_reply(&stub, &sarcastic(), &sam_comment(), 0.7)
            .await
            .unwrap();
        assert_eq!(reply, "Oh wow, thanks Sam. Truly groundbreaking praise.");

        let seen = stub.seen.lock().unwrap();
        let request = &seen[0];
        assert!(request.prompt.contains("Viewer Name: Sam"));
        assert!(
            request
                .system_instruction
                .as_deref()
                .unwrap()
                .contains("Tone: Sarcastic")
        );
    }

    #[tokio::test]
    async fn test_generate_reply_empty_answer_uses_fallback() {
        let stub = StubGenerator::empty();
        let reply = generate_reply(&stub, &sarcastic(), &sam_comment(), 0.7)
            .await
            .unwrap();
        assert_eq!(reply, FALLBACK_REPLY);
        assert!(!reply.is_empty());
    }

    #[tokio::test]
    async fn test_generate_reply_failure_is_generation_error() {
        let stub = StubGenerator::failing();
        let err = generate_reply(&stub, &sarcastic(), &sam_comment(), 0.7)
            .await
            .unwrap_err();
        assert_eq!(err, ReplyError::generation_failed());
    }
}
