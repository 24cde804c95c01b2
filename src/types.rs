//! Core data types: persona, comments, signed-in user

use std::fmt;

use serde::{Deserialize, Serialize};

/// Voice the generated replies should take
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Friendly,
    Professional,
    Humorous,
    Sarcastic,
    Hype,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Friendly,
        Tone::Professional,
        Tone::Humorous,
        Tone::Sarcastic,
        Tone::Hype,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Friendly => "Friendly",
            Self::Professional => "Professional",
            Self::Humorous => "Humorous",
            Self::Sarcastic => "Sarcastic",
            Self::Hype => "Hype",
        }
    }

    /// Case-insensitive lookup; `None` for anything outside the closed set
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(label))
    }

    /// Like [`Tone::from_label`] but coerces unknown values to the default
    pub fn coerce(label: &str) -> Self {
        Self::from_label(label).unwrap_or_default()
    }

    pub fn next(self) -> Self {
        match self {
            Self::Friendly => Self::Professional,
            Self::Professional => Self::Humorous,
            Self::Humorous => Self::Sarcastic,
            Self::Sarcastic => Self::Hype,
            Self::Hype => Self::Friendly,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Friendly => Self::Hype,
            Self::Professional => Self::Friendly,
            Self::Humorous => Self::Professional,
            Self::Sarcastic => Self::Humorous,
            Self::Hype => Self::Sarcastic,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The channel persona used to steer generated replies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelProfile {
    pub name: String,
    pub description: String,
    /// Ordered; the editor refuses duplicates but the type does not
    pub style_keywords: Vec<String>,
    pub tone: Tone,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentStatus {
    #[default]
    Pending,
    Replied,
}

#[allow(dead_code)] // declared for display, never assigned by analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Question,
    Neutral,
}

/// A viewer comment in the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentData {
    pub id: String,
    pub author: String,
    pub text: String,
    /// Display string, not a clock value
    pub timestamp: String,
    pub video_url: Option<String>,
    pub status: CommentStatus,
    pub reply: Option<String>,
    pub sentiment: Option<Sentiment>,
}

impl CommentData {
    pub fn is_replied(&self) -> bool {
        self.status == CommentStatus::Replied
    }

    /// Video URL if present and non-blank
    pub fn video_context(&self) -> Option<&str> {
        self.video_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Basic profile of the signed-in Google account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub avatar_url: String,
}

impl UserProfile {
    /// Single-letter badge for the status bar
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_lookup_is_case_insensitive() {
        assert_eq!(Tone::from_label("hype"), Some(Tone::Hype));
        assert_eq!(Tone::from_label("  SARCASTIC "), Some(Tone::Sarcastic));
        assert_eq!(Tone::from_label("Professional"), Some(Tone::Professional));
        assert_eq!(Tone::from_label("Angry"), None);
    }

    #[test]
    fn test_tone_coerce_defaults_to_friendly() {
        assert_eq!(Tone::coerce("Chill"), Tone::Friendly);
        assert_eq!(Tone::coerce(""), Tone::Friendly);
        assert_eq!(Tone::coerce("humorous"), Tone::Humorous);
    }

    #[test]
    fn test_tone_cycle_visits_every_variant() {
        let mut tone = Tone::Friendly;
        for expected in Tone::ALL.iter().skip(1) {
            tone = tone.next();
            assert_eq!(tone, *expected);
        }
        assert_eq!(tone.next(), Tone::Friendly);
        assert_eq!(Tone::Friendly.prev(), Tone::Hype);
    }

    #[test]
    fn test_video_context_ignores_blank_urls() {
        let mut comment = CommentData {
            id: "1".to_string(),
            author: "Sam".to_string(),
            text: "hi".to_string(),
            timestamp: "Now".to_string(),
            video_url: Some("   ".to_string()),
            status: CommentStatus::Pending,
            reply: None,
            sentiment: None,
        };
        assert_eq!(comment.video_context(), None);

        comment.video_url = Some(" https://youtu.be/abc ".to_string());
        assert_eq!(comment.video_context(), Some("https://youtu.be/abc"));
    }

    #[test]
    fn test_user_initial() {
        let user = UserProfile {
            name: "sam".to_string(),
            ..Default::default()
        };
        assert_eq!(user.initial(), 'S');
        assert_eq!(UserProfile::default().initial(), 'U');
    }
}
