//! Prompt templates for channel analysis and reply generation

use crate::types::{ChannelProfile, CommentData};

/// Instruction asking the model to research a channel and answer in four labeled lines
pub fn channel_analysis_prompt(channel_identifier: &str) -> String {
    format!(
        r#"I need to configure an AI persona for a YouTube channel identified by: "{channel_identifier}".

Tasks:
1. Search for this channel on YouTube (it might be a Name, Handle, Channel ID, or Full URL).
2. Look at the titles and descriptions of the most recent videos found for this channel.
3. Based on the video content, descriptions, and the channel "About" section, analyze the persona.

Return a response in the following strict format:
NAME: [The actual display name of the channel]
DESCRIPTION: [A concise description of the channel's niche based on its video topics (max 300 chars)]
KEYWORDS: [5 comma-separated adjectives describing the style (e.g., fast-paced, educational, chaotic)]
TONE: [Pick exactly one: Friendly, Professional, Humorous, Sarcastic, or Hype]"#
    )
}

/// System instruction embedding the persona verbatim
pub fn reply_system_instruction(profile: &ChannelProfile) -> String {
    format!(
        r#"You are the content creator for the YouTube channel "{name}".

Channel Description:
{description}

Your Persona:
- Tone: {tone}
- Keywords: {keywords}

Task:
Reply to the viewer's comment.
- If a video URL/context is provided, use the search tool to understand what happened in the video so the reply is accurate.
- Be authentic to the creator's style.
- Keep it under 300 characters unless the question is complex."#,
        name = profile.name,
        description = profile.description,
        tone = profile.tone,
        keywords = profile.style_keywords.join(", "),
    )
}

/// User turn: viewer name, comment and optional video context
pub fn reply_user_prompt(comment: &CommentData) -> String {
    let mut prompt = format!(
        "Viewer Name: {}\nViewer Comment: \"{}\"\n",
        comment.author, comment.text
    );

    if let Some(url) = comment.video_context() {
        prompt.push_str(&format!(
            "\nContext: The comment is on this video: {}. Use Google Search to find the video title and description to understand the context.",
            url
        ));
    }

    prompt.push_str("\nWrite the reply:");
    prompt
}
