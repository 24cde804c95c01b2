//! Action handlers for user input
//!
//! This module is split into focused submodules:
//! - `persona`: Persona editing and channel analysis
//! - `workspace`: Comment selection, reply generation and posting
//! - `auth`: Google sign-in and sign-out
//! - `input`: Text input handling
//! - `command`: Command mode operations

mod auth;
mod command;
mod input;
mod persona;
mod workspace;

use crate::input::Action;

use super::App;
use super::state::{Focus, ModalState};

impl App {
    pub(crate) async fn handle_action(&mut self, action: Action) {
        match action {
            // Navigation
            Action::Up => {
                if self.state.modal.is_help() {
                    self.help_scroll_up();
                } else if self.state.focus == Focus::Inbox {
                    self.state.move_up();
                }
            }
            Action::Down => {
                if self.state.modal.is_help() {
                    self.help_scroll_down();
                } else if self.state.focus == Focus::Inbox {
                    self.state.move_down();
                }
            }
            Action::NextFocus => self.state.focus = self.state.focus.next(),
            Action::PrevFocus => self.state.focus = self.state.focus.prev(),
            Action::SwitchTab => self.switch_tab(),
            Action::Open => match self.state.focus {
                Focus::Inbox => self.open_selected(),
                Focus::Persona => self.commit_keyword(),
                Focus::Workspace => {}
            },
            Action::Back => {
                if self.state.modal.is_command() {
                    self.exit_command_mode();
                } else {
                    self.back_to_new();
                }
            }
            Action::NewDraft => self.start_new_draft(),
            Action::Quit => {} // Handled in event loop

            // Form fields
            Action::NextField => self.next_field(),
            Action::PrevField => self.prev_field(),
            Action::ToneNext => self.cycle_tone(true),
            Action::TonePrev => self.cycle_tone(false),
            Action::KeywordPrev => self.state.persona.move_keyword_cursor(false),
            Action::KeywordNext => self.state.persona.move_keyword_cursor(true),

            // AI features
            Action::Analyze => self.analyze_channel().await,
            Action::Generate => self.generate_reply().await,

            // Session
            Action::Post => self.post_reply().await,
            Action::CopyReply => self.copy_reply(),
            Action::SaveDraft => self.save_draft(),
            Action::ClearSession => self.request_clear_session(),

            // Account
            Action::Login => self.login().await,
            Action::Logout => self.logout().await,

            // Command mode
            Action::Command => {
                if !self.state.modal.is_active() {
                    self.state.modal = ModalState::Command {
                        input: String::new(),
                        result: None,
                        pending: None,
                    };
                }
            }
            Action::ExecuteCommand => self.execute_command().await,
            Action::ConfirmCommand => self.confirm_pending_command(),
            Action::CancelCommand => self.cancel_pending_command(),

            // Help
            Action::Help => self.toggle_help(),
        }
    }

    fn toggle_help(&mut self) {
        use crate::command::available_commands;

        if self.state.modal.is_help() {
            self.state.modal = ModalState::None;
        } else if !self.state.modal.is_active() {
            self.state.modal = ModalState::Help {
                keybindings: self.bindings.all_bindings(),
                commands: available_commands(),
                scroll: 0,
            };
        }
    }

    pub(crate) fn help_scroll_down(&mut self) {
        if let ModalState::Help {
            scroll,
            keybindings,
            commands,
        } = &mut self.state.modal
        {
            // One line per binding, two per category header, plus the commands section
            let mut categories = 0;
            let mut last_category = "";
            for kb in keybindings.iter() {
                if kb.category != last_category {
                    categories += 1;
                    last_category = kb.category;
                }
            }
            let content_lines = keybindings.len() + categories * 2 + commands.len() + 2;
            let max_scroll = content_lines.saturating_sub(10); // Approx visible area

            if *scroll < max_scroll {
                *scroll = scroll.saturating_add(1);
            }
        }
    }

    pub(crate) fn help_scroll_up(&mut self) {
        if let ModalState::Help { scroll, .. } = &mut self.state.modal {
            *scroll = scroll.saturating_sub(1);
        }
    }
}
