//! Command mode operations (execute, confirm, cancel)

use crate::app::state::ModalState;
use crate::command::{
    CommandResult, ParsedCommand, PendingCommand, available_commands, parse_command,
};

use super::super::App;

impl App {
    pub(super) async fn execute_command(&mut self) {
        let input = self
            .state
            .modal
            .command_input()
            .unwrap_or_default()
            .trim()
            .to_string();

        if input.is_empty() {
            self.exit_command_mode();
            return;
        }

        match parse_command(&input) {
            Some(ParsedCommand::Analyze) => {
                self.exit_command_mode();
                self.analyze_channel().await;
            }
            Some(ParsedCommand::Clear) => {
                if self.state.workspace.is_empty() {
                    self.set_command_result(CommandResult::Success(
                        "Session history is already empty".to_string(),
                    ));
                } else {
                    self.open_confirmation(PendingCommand::ClearSession);
                }
            }
            Some(ParsedCommand::Help) => {
                self.set_command_result(CommandResult::ShowHelp(available_commands()));
            }
            Some(ParsedCommand::Keys) => {
                let keybindings = self.bindings.all_bindings();
                self.set_command_result(CommandResult::ShowKeys(keybindings));
            }
            Some(ParsedCommand::Login) => {
                self.exit_command_mode();
                self.login().await;
            }
            Some(ParsedCommand::Logout) => {
                self.exit_command_mode();
                self.logout().await;
            }
            Some(ParsedCommand::Quit) => {
                self.exit_command_mode();
                self.quit_requested = true;
            }
            Some(ParsedCommand::Tone(tone)) => {
                self.state.persona.profile.tone = tone;
                self.set_command_result(CommandResult::Success(format!("Tone set to {}", tone)));
            }
            None => {
                self.set_command_result(CommandResult::Error(format!(
                    "Unknown command: {}. Type :help for available commands.",
                    input
                )));
            }
        }
    }

    /// Ctrl+x: same confirmation as `:clear`
    pub(super) fn request_clear_session(&mut self) {
        if self.state.modal.is_active() {
            return;
        }
        if self.state.workspace.is_empty() {
            self.state.set_status("Session history is already empty");
            return;
        }
        self.state.modal = ModalState::Command {
            input: String::new(),
            result: None,
            pending: None,
        };
        self.open_confirmation(PendingCommand::ClearSession);
    }

    pub(super) fn confirm_pending_command(&mut self) {
        let pending = match &mut self.state.modal {
            ModalState::Command { pending, .. } => pending.take(),
            _ => None,
        };
        if let Some(pending) = pending {
            match pending {
                PendingCommand::ClearSession => {
                    self.state.workspace.clear();
                    self.state.inbox_cursor = 0;
                    tracing::info!("Session history cleared");
                    self.state.set_status("Session history cleared");
                }
            }
            self.exit_command_mode();
        }
    }

    pub(super) fn cancel_pending_command(&mut self) {
        self.exit_command_mode();
        self.state.set_status("Cancelled");
    }

    pub(crate) fn exit_command_mode(&mut self) {
        if self.state.modal.is_command() {
            self.state.modal = ModalState::None;
        }
    }

    fn open_confirmation(&mut self, command: PendingCommand) {
        if let ModalState::Command {
            input,
            result,
            pending,
        } = &mut self.state.modal
        {
            input.clear();
            *result = Some(CommandResult::Success(command.prompt().to_string()));
            *pending = Some(command);
        }
    }

    /// Show a result and clear the input for the next command
    fn set_command_result(&mut self, command_result: CommandResult) {
        if let ModalState::Command { input, result, .. } = &mut self.state.modal {
            input.clear();
            *result = Some(command_result);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ai::AiCommand;
    use crate::app::actions::tests::harness;
    use crate::app::state::ModalState;
    use crate::command::{CommandResult, PendingCommand};
    use crate::input::Action;
    use crate::types::Tone;

    async fn run_command(h: &mut crate::app::actions::tests::Harness, command: &str) {
        h.app.handle_action(Action::Command).await;
        for c in command.chars() {
            h.app.handle_char(c);
        }
        h.app.handle_action(Action::ExecuteCommand).await;
    }

    fn saved_comments(h: &mut crate::app::actions::tests::Harness, count: usize) {
        for i in 0..count {
            h.app.state.workspace.input.text = format!("comment {}", i);
            h.app.state.workspace.save_draft().unwrap();
        }
    }

    #[tokio::test]
    async fn test_quit_command_requests_exit() {
        let mut h = harness(true);
        run_command(&mut h, "quit").await;
        assert!(h.app.quit_requested);
        assert!(!h.app.state.modal.is_active());
    }

    #[tokio::test]
    async fn test_unknown_command_reports_error() {
        let mut h = harness(true);
        run_command(&mut h, "frobnicate").await;
        match h.app.state.modal.command_result() {
            Some(CommandResult::Error(msg)) => assert!(msg.contains("frobnicate")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(h.app.state.modal.command_input(), Some(""));
    }

    #[tokio::test]
    async fn test_tone_command_sets_persona_tone() {
        let mut h = harness(true);
        run_command(&mut h, "tone humorous").await;
        assert_eq!(h.app.state.persona.profile.tone, Tone::Humorous);
    }

    #[tokio::test]
    async fn test_analyze_command_leaves_command_mode() {
        let mut h = harness(true);
        h.app.state.persona.profile.name = "@chan".to_string();
        run_command(&mut h, "analyze").await;
        assert!(!h.app.state.modal.is_active());
        assert!(matches!(
            h.ai_cmds.try_recv().unwrap(),
            AiCommand::AnalyzeChannel { .. }
        ));
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let mut h = harness(true);
        saved_comments(&mut h, 2);

        run_command(&mut h, "clear").await;
        assert_eq!(
            h.app.state.modal.pending_confirmation(),
            Some(&PendingCommand::ClearSession)
        );
        assert_eq!(h.app.state.workspace.comments().len(), 2);

        h.app.handle_action(Action::ConfirmCommand).await;
        assert!(h.app.state.workspace.is_empty());
        assert!(!h.app.state.modal.is_active());
    }

    #[tokio::test]
    async fn test_cancelled_clear_keeps_history() {
        let mut h = harness(true);
        saved_comments(&mut h, 1);

        h.app.handle_action(Action::ClearSession).await;
        assert!(h.app.state.modal.pending_confirmation().is_some());
        h.app.handle_action(Action::CancelCommand).await;

        assert_eq!(h.app.state.workspace.comments().len(), 1);
        assert!(matches!(h.app.state.modal, ModalState::None));
    }

    #[tokio::test]
    async fn test_clear_on_empty_session_skips_prompt() {
        let mut h = harness(true);
        h.app.handle_action(Action::ClearSession).await;
        assert!(!h.app.state.modal.is_active());
        assert_eq!(h.app.state.status.message, "Session history is already empty");
    }
}
