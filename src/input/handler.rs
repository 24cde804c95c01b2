use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::keybindings::{Action, KeyBindings};
use crate::app::state::{AppState, DraftField, Focus, View};
use crate::persona::PersonaField;

pub enum InputResult {
    Continue,
    Quit,
    Action(Action),
    Char(char),
    Backspace,
}

pub fn handle_input(event: Event, state: &AppState, bindings: &KeyBindings) -> InputResult {
    match event {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
            handle_key(key_event, state, bindings)
        }
        _ => InputResult::Continue,
    }
}

fn handle_key(key: KeyEvent, state: &AppState, bindings: &KeyBindings) -> InputResult {
    if state.view == View::MissingApiKey {
        return handle_missing_key_input(key, bindings);
    }

    if state.modal.is_help() {
        return handle_help_input(key, bindings);
    }

    if state.modal.is_command() {
        return handle_command_input(key, state);
    }

    // Chords and pane switching work everywhere
    if let Some(action) = bindings.get(&key) {
        if action == Action::Quit && key.modifiers.contains(KeyModifiers::CONTROL) {
            return InputResult::Quit;
        }
        if action.is_global() || matches!(key.code, KeyCode::F(_)) {
            return InputResult::Action(action);
        }
    }

    match state.focus {
        Focus::Inbox => handle_inbox_input(key, bindings),
        Focus::Persona => handle_persona_input(key, state),
        Focus::Workspace if state.is_editing_text() => handle_draft_input(key, state),
        Focus::Workspace => handle_comment_view_input(key),
    }
}

fn handle_missing_key_input(key: KeyEvent, bindings: &KeyBindings) -> InputResult {
    match bindings.get(&key) {
        Some(Action::Quit) | Some(Action::Back) => InputResult::Quit,
        _ => InputResult::Continue,
    }
}

fn handle_help_input(key: KeyEvent, bindings: &KeyBindings) -> InputResult {
    // In help modal: j/k scroll, Esc, ? or F1 closes
    if let Some(action) = bindings.get(&key) {
        match action {
            Action::Help | Action::Back => return InputResult::Action(Action::Help),
            Action::Up => return InputResult::Action(Action::Up),
            Action::Down => return InputResult::Action(Action::Down),
            Action::Quit if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return InputResult::Quit;
            }
            _ => {}
        }
    }
    InputResult::Continue
}

fn handle_command_input(key: KeyEvent, state: &AppState) -> InputResult {
    // If awaiting confirmation (e.g., for :clear)
    if state.modal.pending_confirmation().is_some() {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => InputResult::Action(Action::ConfirmCommand),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                InputResult::Action(Action::CancelCommand)
            }
            _ => InputResult::Continue,
        };
    }

    // Normal command input
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            InputResult::Char(c)
        }
        KeyCode::Backspace => InputResult::Backspace,
        KeyCode::Enter => InputResult::Action(Action::ExecuteCommand),
        KeyCode::Esc => InputResult::Action(Action::Back),
        _ => InputResult::Continue,
    }
}

fn handle_inbox_input(key: KeyEvent, bindings: &KeyBindings) -> InputResult {
    match bindings.get(&key) {
        Some(Action::Quit) => InputResult::Quit,
        Some(action) => InputResult::Action(action),
        None => match key.code {
            KeyCode::Char('1') | KeyCode::Char('2') => InputResult::Action(Action::SwitchTab),
            _ => InputResult::Continue,
        },
    }
}

fn handle_persona_input(key: KeyEvent, state: &AppState) -> InputResult {
    let field = state.persona.field;
    match key.code {
        KeyCode::Up => InputResult::Action(Action::PrevField),
        KeyCode::Down => InputResult::Action(Action::NextField),
        KeyCode::Left if field == PersonaField::Tone => InputResult::Action(Action::TonePrev),
        KeyCode::Right | KeyCode::Char(' ') if field == PersonaField::Tone => {
            InputResult::Action(Action::ToneNext)
        }
        // Arrows walk the keyword chips once the input is empty
        KeyCode::Left
            if field == PersonaField::Keywords && state.persona.keyword_input.is_empty() =>
        {
            InputResult::Action(Action::KeywordPrev)
        }
        KeyCode::Right
            if field == PersonaField::Keywords && state.persona.keyword_input.is_empty() =>
        {
            InputResult::Action(Action::KeywordNext)
        }
        KeyCode::Enter => match field {
            PersonaField::Name => InputResult::Action(Action::Analyze),
            // Commits the typed keyword
            PersonaField::Keywords => InputResult::Action(Action::Open),
            PersonaField::Description | PersonaField::Tone => {
                InputResult::Action(Action::NextField)
            }
        },
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            InputResult::Char(c)
        }
        KeyCode::Backspace => InputResult::Backspace,
        _ => InputResult::Continue,
    }
}

fn handle_draft_input(key: KeyEvent, state: &AppState) -> InputResult {
    match key.code {
        KeyCode::Up => InputResult::Action(Action::PrevField),
        KeyCode::Down => InputResult::Action(Action::NextField),
        // Comments and replies may span several lines
        KeyCode::Enter
            if matches!(
                state.active_draft_field(),
                Some(DraftField::Text | DraftField::Reply)
            ) =>
        {
            InputResult::Char('\n')
        }
        KeyCode::Enter => InputResult::Action(Action::NextField),
        KeyCode::Esc => InputResult::Action(Action::Back),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            InputResult::Char(c)
        }
        KeyCode::Backspace => InputResult::Backspace,
        _ => InputResult::Continue,
    }
}

/// Saved comments without a pending reply are read-only; Esc returns to the new draft
fn handle_comment_view_input(key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Esc => InputResult::Action(Action::Back),
        _ => InputResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::ModalState;
    use crate::command::PendingCommand;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_quit_from_inbox() {
        let bindings = KeyBindings::new();
        let state = AppState {
            focus: Focus::Inbox,
            ..Default::default()
        };

        let result = handle_key(press(KeyCode::Char('q')), &state, &bindings);
        assert!(matches!(result, InputResult::Quit));
    }

    #[test]
    fn test_letters_type_into_persona_fields() {
        let bindings = KeyBindings::new();
        let state = AppState::default();

        let result = handle_key(press(KeyCode::Char('q')), &state, &bindings);
        assert!(matches!(result, InputResult::Char('q')));
        let result = handle_key(press(KeyCode::Char('j')), &state, &bindings);
        assert!(matches!(result, InputResult::Char('j')));
    }

    #[test]
    fn test_chords_work_while_typing() {
        let bindings = KeyBindings::new();
        let state = AppState {
            focus: Focus::Workspace,
            ..Default::default()
        };

        assert!(matches!(
            handle_key(ctrl('g'), &state, &bindings),
            InputResult::Action(Action::Generate)
        ));
        assert!(matches!(
            handle_key(ctrl('q'), &state, &bindings),
            InputResult::Quit
        ));
        assert!(matches!(
            handle_key(press(KeyCode::Tab), &state, &bindings),
            InputResult::Action(Action::NextFocus)
        ));
    }

    #[test]
    fn test_enter_in_comment_text_is_newline() {
        let bindings = KeyBindings::new();
        let mut state = AppState {
            focus: Focus::Workspace,
            ..Default::default()
        };
        assert!(matches!(
            handle_key(press(KeyCode::Enter), &state, &bindings),
            InputResult::Char('\n')
        ));

        state.draft_field = DraftField::Author;
        assert!(matches!(
            handle_key(press(KeyCode::Enter), &state, &bindings),
            InputResult::Action(Action::NextField)
        ));
    }

    #[test]
    fn test_enter_in_reply_is_newline() {
        let bindings = KeyBindings::new();
        let mut state = AppState {
            focus: Focus::Workspace,
            draft_field: DraftField::Reply,
            ..Default::default()
        };
        state.workspace.input.text = "hello".to_string();
        let ticket = state.workspace.generate().unwrap();
        state
            .workspace
            .finish_generation(ticket.seq, Ok("hi!".to_string()))
            .unwrap();

        assert_eq!(state.active_draft_field(), Some(DraftField::Reply));
        assert!(matches!(
            handle_key(press(KeyCode::Enter), &state, &bindings),
            InputResult::Char('\n')
        ));
        assert!(matches!(
            handle_key(press(KeyCode::Esc), &state, &bindings),
            InputResult::Action(Action::Back)
        ));
    }

    #[test]
    fn test_arrows_walk_keywords_only_with_empty_input() {
        let bindings = KeyBindings::new();
        let mut state = AppState::default();
        state.persona.field = PersonaField::Keywords;
        assert!(matches!(
            handle_key(press(KeyCode::Left), &state, &bindings),
            InputResult::Action(Action::KeywordPrev)
        ));
        assert!(matches!(
            handle_key(press(KeyCode::Right), &state, &bindings),
            InputResult::Action(Action::KeywordNext)
        ));

        state.persona.keyword_input = "nerd".to_string();
        assert!(matches!(
            handle_key(press(KeyCode::Left), &state, &bindings),
            InputResult::Continue
        ));
    }

    #[test]
    fn test_enter_on_name_field_analyzes() {
        let bindings = KeyBindings::new();
        let state = AppState::default();
        assert!(matches!(
            handle_key(press(KeyCode::Enter), &state, &bindings),
            InputResult::Action(Action::Analyze)
        ));
    }

    #[test]
    fn test_clear_confirmation_keys() {
        let bindings = KeyBindings::new();
        let state = AppState {
            modal: ModalState::Command {
                input: String::new(),
                result: None,
                pending: Some(PendingCommand::ClearSession),
            },
            ..Default::default()
        };

        assert!(matches!(
            handle_key(press(KeyCode::Char('y')), &state, &bindings),
            InputResult::Action(Action::ConfirmCommand)
        ));
        assert!(matches!(
            handle_key(press(KeyCode::Enter), &state, &bindings),
            InputResult::Continue
        ));
        assert!(matches!(
            handle_key(press(KeyCode::Esc), &state, &bindings),
            InputResult::Action(Action::CancelCommand)
        ));
    }

    #[test]
    fn test_missing_api_key_only_quits() {
        let bindings = KeyBindings::new();
        let state = AppState {
            view: View::MissingApiKey,
            ..Default::default()
        };

        assert!(matches!(
            handle_key(ctrl('g'), &state, &bindings),
            InputResult::Continue
        ));
        assert!(matches!(
            handle_key(press(KeyCode::Char('q')), &state, &bindings),
            InputResult::Quit
        ));
    }
}
