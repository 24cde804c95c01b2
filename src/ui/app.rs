use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Block,
};

use crate::app::state::{AppState, Focus, ModalState, View};
use crate::command::CommandResult;
use crate::constants::{INBOX_PANE_PERCENT, MIN_THREE_PANE_WIDTH, PERSONA_PANE_PERCENT};
use crate::workspace::Selection;

use super::inbox::render_inbox;
use super::persona::render_persona;
use super::popups::{render_command_bar, render_help_popup, render_missing_api_key};
use super::status_bar::status_bar;
use super::theme::Theme;
use super::widgets::{error_bar, help_bar};
use super::workspace::render_workspace;

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Theme::main_bg()), area);

    match state.view {
        View::MissingApiKey => render_missing_api_key(frame, area),
        View::Main => render_main(frame, area, state),
    }
}

fn render_main(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(0),    // Panes
            Constraint::Length(1), // Help bar, error, or command bar
        ])
        .split(area);

    status_bar(frame, chunks[0], state);
    render_panes(frame, chunks[1], state);

    let bottom = chunks[2];
    if state.modal.is_command() {
        render_command_bar(frame, bottom, state);
    } else if let Some(ref error) = state.status.error {
        error_bar(frame, bottom, error);
    } else {
        help_bar(frame, bottom, hints(state));
    }

    // Overlays (rendered last so they appear on top)
    match &state.modal {
        ModalState::Help {
            keybindings,
            commands,
            scroll,
        } => render_help_popup(frame, area, keybindings, commands, *scroll),
        ModalState::Command {
            result: Some(CommandResult::ShowHelp(commands)),
            ..
        } => render_help_popup(frame, area, &[], commands, 0),
        ModalState::Command {
            result: Some(CommandResult::ShowKeys(keys)),
            ..
        } => render_help_popup(frame, area, keys, &[], 0),
        _ => {}
    }
}

fn render_panes(frame: &mut Frame, area: Rect, state: &AppState) {
    let focus = state.focus;

    // Narrow terminal: only the focused pane
    if area.width < MIN_THREE_PANE_WIDTH {
        match focus {
            Focus::Persona => render_persona(frame, area, state, true),
            Focus::Inbox => render_inbox(frame, area, state, true),
            Focus::Workspace => render_workspace(frame, area, state, true),
        }
        return;
    }

    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(PERSONA_PANE_PERCENT),
            Constraint::Percentage(INBOX_PANE_PERCENT),
            Constraint::Min(0),
        ])
        .split(area);

    render_persona(frame, split[0], state, focus == Focus::Persona);
    render_inbox(frame, split[1], state, focus == Focus::Inbox);
    render_workspace(frame, split[2], state, focus == Focus::Workspace);
}

fn hints(state: &AppState) -> &'static [(&'static str, &'static str)] {
    match state.focus {
        Focus::Persona => &[
            ("↑/↓", "field"),
            ("Enter", "analyze/add"),
            ("←/→", "keywords"),
            ("Ctrl+t", "tone"),
            ("Tab", "pane"),
            ("F1", "help"),
        ],
        Focus::Inbox => &[
            ("j/k", "nav"),
            ("Enter", "open"),
            ("h/l", "tab"),
            ("n", "new"),
            (":", "command"),
            ("?", "help"),
        ],
        Focus::Workspace if state.workspace.selection == Selection::New => &[
            ("Ctrl+g", "generate"),
            ("Ctrl+p", "post"),
            ("Ctrl+y", "copy"),
            ("Ctrl+s", "save"),
            ("↑/↓", "field"),
            ("Tab", "pane"),
            ("F1", "help"),
        ],
        Focus::Workspace => &[
            ("Ctrl+g", "generate"),
            ("Ctrl+p", "post"),
            ("Ctrl+y", "copy"),
            ("Esc", "new comment"),
            ("Tab", "pane"),
            ("F1", "help"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::auth::{AccessToken, AuthState};
    use crate::types::UserProfile;

    fn draw(state: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn busy_state() -> AppState {
        let mut state = AppState::new(View::Main, AuthState::new(true));
        state.workspace.input.author = "Alex".to_string();
        state.workspace.input.text = "Loved this one".to_string();
        state.workspace.save_draft();
        state.persona.profile.name = "Gamer Central".to_string();
        state.persona.profile.style_keywords = vec!["hype".to_string()];
        state.auth.logged_in(
            UserProfile {
                name: "Sam".to_string(),
                email: "sam@example.com".to_string(),
                avatar_url: String::new(),
            },
            AccessToken::new("tok"),
        );
        state
    }

    #[test]
    fn test_wide_terminal_shows_all_panes() {
        let screen = draw(&busy_state(), 140, 30);
        assert!(screen.contains("Channel Persona"));
        assert!(screen.contains("Drafts (1)"));
        assert!(screen.contains("New Comment"));
        assert!(screen.contains("Sam"));
        assert!(screen.contains("Alex"));
    }

    #[test]
    fn test_narrow_terminal_shows_focused_pane_only() {
        let mut state = busy_state();
        state.focus = Focus::Inbox;
        let screen = draw(&state, 70, 24);
        assert!(screen.contains("Drafts (1)"));
        assert!(!screen.contains("Channel Persona"));
    }

    #[test]
    fn test_missing_api_key_screen() {
        let state = AppState::new(View::MissingApiKey, AuthState::default());
        let screen = draw(&state, 100, 30);
        assert!(screen.contains("API Key Missing"));
    }

    #[test]
    fn test_error_replaces_help_bar() {
        let mut state = busy_state();
        state.set_error("Failed to generate reply.");
        let screen = draw(&state, 140, 30);
        assert!(screen.contains("Error: Failed to generate reply."));
    }

    #[test]
    fn test_generated_reply_is_marked_editable() {
        let mut state = busy_state();
        state.focus = Focus::Workspace;
        state.workspace.input.text = "First!".to_string();
        let ticket = state.workspace.generate().unwrap();
        state
            .workspace
            .finish_generation(ticket.seq, Ok("Thanks for being early".to_string()))
            .unwrap();

        let screen = draw(&state, 140, 30);
        assert!(screen.contains("Reply (editable)"));
        assert!(screen.contains("Thanks for being early"));
        assert!(screen.contains("Ctrl+y"));
    }
}
