//! Extraction of the labeled persona lines from a free-form model answer
//!
//! The model is asked for `NAME:`, `DESCRIPTION:`, `KEYWORDS:` and `TONE:`
//! lines but nothing enforces that, so every field has its own fallback and
//! parsing never fails.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{ChannelProfile, Tone};

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| label_regex("NAME"));
static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| label_regex("DESCRIPTION"));
static KEYWORDS_RE: LazyLock<Regex> = LazyLock::new(|| label_regex("KEYWORDS"));
static TONE_RE: LazyLock<Regex> = LazyLock::new(|| label_regex("TONE"));

/// `LABEL:` followed by the rest of that line (case-insensitive label).
/// `[ \t]*` rather than `\s*` so an empty value never swallows the next line.
fn label_regex(label: &str) -> Regex {
    Regex::new(&format!(r"(?i){}:[ \t]*(?P<value>[^\r\n]+)", label))
        .expect("label pattern is a valid regex")
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.name("value"))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split a keyword line on commas, trimming tokens and dropping empty ones
pub fn split_keywords(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a profile from the model's answer.
///
/// Fallbacks: name → `channel_identifier`, description → empty,
/// keywords → empty, tone → [`Tone::Friendly`] (also for unknown tones).
pub fn parse_channel_profile(text: &str, channel_identifier: &str) -> ChannelProfile {
    let name = capture(&NAME_RE, text).unwrap_or_else(|| channel_identifier.to_string());
    let description = capture(&DESCRIPTION_RE, text).unwrap_or_default();
    let style_keywords = capture(&KEYWORDS_RE, text)
        .map(|line| split_keywords(&line))
        .unwrap_or_default();
    let tone = capture(&TONE_RE, text)
        .map(|t| Tone::coerce(&t))
        .unwrap_or_default();

    ChannelProfile {
        name,
        description,
        style_keywords,
        tone,
    }
}
