//! Text input handling (chars, backspace)

use crate::app::state::{Focus, ModalState};

use super::super::App;

impl App {
    pub(crate) fn handle_char(&mut self, c: char) {
        // Handle command input
        if let ModalState::Command { input, pending, .. } = &mut self.state.modal {
            if pending.is_none() {
                input.push(c);
            }
            return;
        }
        if self.state.modal.is_active() {
            return;
        }

        match self.state.focus {
            Focus::Persona => self.state.persona.push_char(c),
            Focus::Workspace => {
                if let Some(text) = self.state.draft_text_mut() {
                    text.push(c);
                }
            }
            Focus::Inbox => {}
        }
    }

    pub(crate) fn handle_backspace(&mut self) {
        // Handle command backspace
        if let ModalState::Command { input, .. } = &mut self.state.modal {
            input.pop();
            return;
        }
        if self.state.modal.is_active() {
            return;
        }

        match self.state.focus {
            Focus::Persona => self.state.persona.backspace(),
            Focus::Workspace => {
                if let Some(text) = self.state.draft_text_mut() {
                    text.pop();
                }
            }
            Focus::Inbox => {}
        }
    }
}
