//! Inbox navigation and the reply workspace (generate, post, save)

use crate::ai::AiCommand;
use crate::app::state::{DraftField, Focus};
use crate::clipboard::{ArboardClipboard, ClipboardWriter};
use crate::error::ReplyError;
use crate::workspace::{PostOutcome, Selection};

use super::super::App;

impl App {
    pub(super) fn switch_tab(&mut self) {
        self.state.workspace.tab = self.state.workspace.tab.toggle();
        self.state.inbox_cursor = 0;
    }

    /// Load the comment under the inbox cursor into the workspace
    pub(super) fn open_selected(&mut self) {
        let Some(id) = self.state.comment_under_cursor().map(|c| c.id.clone()) else {
            return;
        };
        self.state.workspace.select(Selection::Comment(id));
        self.state.focus = Focus::Workspace;
    }

    pub(super) fn back_to_new(&mut self) {
        if self.state.workspace.selection != Selection::New {
            self.state.workspace.select(Selection::New);
        }
    }

    pub(super) fn start_new_draft(&mut self) {
        self.state.workspace.select(Selection::New);
        self.state.focus = Focus::Workspace;
        self.state.draft_field = DraftField::Text;
    }

    pub(super) fn next_field(&mut self) {
        match self.state.focus {
            Focus::Persona => {
                let field = self.state.persona.field.next();
                self.state.persona.set_field(field);
            }
            Focus::Workspace => self.state.cycle_draft_field(true),
            Focus::Inbox => {}
        }
    }

    pub(super) fn prev_field(&mut self) {
        match self.state.focus {
            Focus::Persona => {
                let field = self.state.persona.field.prev();
                self.state.persona.set_field(field);
            }
            Focus::Workspace => self.state.cycle_draft_field(false),
            Focus::Inbox => {}
        }
    }

    /// Generate, or regenerate when a reply is already shown
    pub(super) async fn generate_reply(&mut self) {
        let Some(cmd_tx) = self.ai_actor.as_ref().map(|ai| ai.cmd_tx.clone()) else {
            self.state.set_error("AI features unavailable: no Gemini API key");
            return;
        };

        let workspace = &mut self.state.workspace;
        let ticket = if workspace.reply.is_some() {
            workspace.regenerate()
        } else {
            workspace.generate()
        };
        let Some(ticket) = ticket else {
            let reason = self.generation_refusal();
            self.state.set_status(reason);
            return;
        };

        self.state.set_status("Drafting a reply...");
        let seq = ticket.seq;
        let command = AiCommand::GenerateReply {
            seq,
            profile: self.state.persona.profile.clone(),
            comment: ticket.comment,
        };
        if cmd_tx.send(command).await.is_err() {
            tracing::error!("AI actor is gone; cannot generate");
            self.on_reply_generated(seq, Err(ReplyError::generation_failed()));
        }
    }

    fn generation_refusal(&self) -> &'static str {
        let workspace = &self.state.workspace;
        if workspace.generating {
            return "Already drafting a reply...";
        }
        match workspace.active_comment() {
            None => "Select a comment to reply to",
            Some(comment) if comment.is_replied() => "This comment already has a reply",
            Some(_) => "Paste a comment to reply to first",
        }
    }

    pub(crate) fn on_reply_generated(&mut self, seq: u64, result: Result<String, ReplyError>) {
        match self.state.workspace.finish_generation(seq, result) {
            Ok(true) => self
                .state
                .set_status("Reply ready: Ctrl+p to post, Ctrl+g to regenerate"),
            Ok(false) => {}
            Err(e) => {
                self.state.set_status("");
                self.state.set_error(e);
            }
        }
    }

    pub(super) async fn post_reply(&mut self) {
        let user = self.state.auth.user.clone();
        match self.state.workspace.post(user.as_ref()) {
            PostOutcome::Posted { .. } => {
                self.state.clamp_inbox_cursor();
                self.state.set_status("Reply posted");
            }
            PostOutcome::LoginRequired => {
                self.state.set_status("Sign in to post replies");
                self.login().await;
            }
            PostOutcome::NothingToPost => {
                self.state.set_status("Generate a reply before posting");
            }
        }
    }

    /// Copy the shown reply, opening the system clipboard on first use
    pub(super) fn copy_reply(&mut self) {
        let workspace = &self.state.workspace;
        let Some(reply) = workspace
            .reply
            .as_deref()
            .filter(|r| !workspace.generating && !r.trim().is_empty())
        else {
            self.state.set_status("Nothing to copy yet");
            return;
        };
        let reply = reply.to_string();

        let result = self
            .clipboard()
            .and_then(|clipboard| clipboard.write_text(&reply));
        match result {
            Ok(()) => self.state.set_status("Reply copied to clipboard"),
            Err(e) => {
                tracing::warn!("Failed to copy reply: {}", e);
                self.state.set_error(e);
            }
        }
    }

    fn clipboard(&mut self) -> Result<&mut dyn ClipboardWriter, ReplyError> {
        let clipboard: Box<dyn ClipboardWriter> = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => Box::new(ArboardClipboard::new()?),
        };
        Ok(self.clipboard.insert(clipboard).as_mut())
    }

    pub(super) fn save_draft(&mut self) {
        match self.state.workspace.save_draft() {
            Some(_) => {
                self.state.inbox_cursor = 0;
                self.state.set_status("Comment saved to Drafts");
            }
            None => self
                .state
                .set_status("Only a new comment with text can be saved"),
        }
    }
}
