//! Status bar rendering with busy spinner, session counts and the user badge

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use super::theme::{Theme, symbols};
use super::widgets::truncate_string;
use crate::app::state::AppState;
use crate::constants::SPINNER_FRAME_MS;
use crate::workspace::InboxTab;

pub fn status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let style = Theme::status_bar();
    let width = area.width as usize;

    // Left: activity indicator, error flag, session counts
    let mut left: Vec<Span> = Vec::new();
    if state.is_busy() {
        left.push(Span::styled(format!(" {} ", spinner_char()), Theme::status_busy()));
    } else {
        left.push(Span::styled("   ", style));
    }
    if state.has_unacknowledged_error() {
        left.push(Span::styled(format!("{} ", symbols::ERROR), Theme::status_error()));
    }
    left.push(Span::styled("TubeReply ", style.add_modifier(ratatui::style::Modifier::BOLD)));
    left.push(Span::styled(
        format!(
            "Drafts {} · Replied {}",
            state.workspace.count(InboxTab::Pending),
            state.workspace.count(InboxTab::Replied)
        ),
        Theme::status_muted(),
    ));

    // Right: account
    let account = account_spans(state);
    let account_width: usize = account.iter().map(|s| s.content.width()).sum();
    let left_width: usize = left.iter().map(|s| s.content.width()).sum();

    // Status message takes whatever is left in the middle
    let message_room = width.saturating_sub(left_width + account_width + 4);
    let message = if state.status.message.is_empty() || message_room < 8 {
        String::new()
    } else {
        format!("{} │ ", truncate_string(&state.status.message, message_room - 3))
    };

    let padding = width.saturating_sub(left_width + message.width() + account_width);

    let mut spans = left;
    spans.push(Span::styled(" ".repeat(padding), style));
    spans.push(Span::styled(message, Theme::status_muted()));
    spans.extend(account);

    frame.render_widget(Paragraph::new(Line::from(spans)).style(style), area);
}

fn account_spans(state: &AppState) -> Vec<Span<'static>> {
    let auth = &state.auth;
    if let Some(user) = &auth.user {
        return vec![
            Span::styled(format!("{} ", symbols::SIGNED_IN), Theme::status_signed_in()),
            Span::styled(format!(" {} ", user.initial()), Theme::user_badge()),
            Span::styled(format!(" {} ", user.name), Theme::status_bar()),
        ];
    }
    if auth.loading {
        return vec![Span::styled("Loading profile... ", Theme::status_busy())];
    }
    if auth.login_in_flight {
        return vec![Span::styled("Signing in... ", Theme::status_busy())];
    }
    vec![
        Span::styled(format!("{} ", symbols::SIGNED_OUT), Theme::status_muted()),
        Span::styled("Not signed in ", Theme::status_muted()),
    ]
}

/// Get an animated spinner character for loading states
pub fn spinner_char() -> char {
    let spinner = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let idx = (millis / SPINNER_FRAME_MS) as usize % spinner.chars().count();

    spinner.chars().nth(idx).unwrap_or('*')
}
