//! Persona editing and channel analysis

use crate::ai::AiCommand;
use crate::app::state::Focus;
use crate::error::ReplyError;
use crate::types::ChannelProfile;

use super::super::App;

impl App {
    /// Send the persona name field to the AI actor for research
    pub(super) async fn analyze_channel(&mut self) {
        if self.state.persona.analyzing {
            self.state.set_status("Analysis already running...");
            return;
        }
        let Some(cmd_tx) = self.ai_actor.as_ref().map(|ai| ai.cmd_tx.clone()) else {
            self.state.set_error("AI features unavailable: no Gemini API key");
            return;
        };
        let Some((seq, identifier)) = self.state.persona.begin_analysis() else {
            self.state.focus = Focus::Persona;
            self.state.set_status("Enter a channel URL, ID, or name to analyze");
            return;
        };

        self.state
            .set_status(format!("Researching {} with Google Search...", identifier));
        if cmd_tx
            .send(AiCommand::AnalyzeChannel { seq, identifier })
            .await
            .is_err()
        {
            tracing::error!("AI actor is gone; cannot analyze");
            self.on_profile_analyzed(seq, Err(ReplyError::analysis_failed()));
        }
    }

    pub(crate) fn on_profile_analyzed(
        &mut self,
        seq: u64,
        result: Result<ChannelProfile, ReplyError>,
    ) {
        match self.state.persona.finish_analysis(seq, result) {
            Ok(true) => {
                let profile = &self.state.persona.profile;
                tracing::info!(
                    "Persona loaded: {} ({}, {} keywords)",
                    profile.name,
                    profile.tone,
                    profile.style_keywords.len()
                );
                self.state
                    .set_status(format!("Persona loaded for {}", profile.name));
            }
            Ok(false) => {}
            Err(e) => {
                self.state.set_status("");
                self.state.set_error(e);
            }
        }
    }

    pub(super) fn commit_keyword(&mut self) {
        if self.state.persona.commit_keyword() == 0 {
            self.state.set_status("Keyword already in the list");
        }
    }

    pub(super) fn cycle_tone(&mut self, forward: bool) {
        self.state.persona.cycle_tone(forward);
        let tone = self.state.persona.profile.tone;
        self.state.set_status(format!("Tone: {}", tone));
    }
}
