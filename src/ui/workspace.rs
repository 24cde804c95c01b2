//! Reply workspace pane: the comment being answered and the generated reply

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::status_bar::spinner_char;
use super::theme::{Theme, symbols};
use super::widgets::{input_lines, pane_block};
use crate::app::state::{AppState, DraftField};
use crate::types::CommentData;
use crate::workspace::Selection;

pub fn render_workspace(frame: &mut Frame, area: Rect, state: &AppState, focused: bool) {
    let workspace = &state.workspace;
    let title = match workspace.selection {
        Selection::New => " New Comment ",
        Selection::Comment(_) => " Comment ",
    };
    let block = pane_block(title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(comment) = workspace.active_comment() else {
        let paragraph = Paragraph::new("This comment is no longer in the session.")
            .style(Theme::text_muted());
        frame.render_widget(paragraph, inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50), // Comment
            Constraint::Length(1),      // Persona summary
            Constraint::Min(3),         // Reply
        ])
        .split(inner);

    let comment_lines = match workspace.selection {
        Selection::New => draft_lines(state, focused),
        Selection::Comment(_) => saved_comment_lines(&comment),
    };
    let paragraph = Paragraph::new(comment_lines)
        .style(Theme::text())
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, chunks[0]);

    let profile = &state.persona.profile;
    let voice = if profile.name.trim().is_empty() {
        "your channel"
    } else {
        profile.name.trim()
    };
    let summary = Line::from(vec![
        Span::styled("Replying as ", Theme::text_muted()),
        Span::styled(voice.to_string(), Theme::text_secondary()),
        Span::styled(" · ", Theme::text_muted()),
        Span::styled(profile.tone.as_str(), Theme::text_accent()),
    ]);
    frame.render_widget(Paragraph::new(summary), chunks[1]);

    render_reply(frame, chunks[2], state, &comment, focused);
}

fn draft_lines(state: &AppState, focused: bool) -> Vec<Line<'_>> {
    let input = &state.workspace.input;
    let mut lines = Vec::new();

    let fields = [
        (DraftField::Author, "Author", input.author.as_str(), "Viewer"),
        (
            DraftField::Text,
            "Comment",
            input.text.as_str(),
            "Paste a viewer comment to reply to",
        ),
        (
            DraftField::VideoUrl,
            "Video URL",
            input.video_url.as_str(),
            "optional, gives the reply some context",
        ),
    ];
    for (field, label, value, placeholder) in fields {
        let active = focused && state.active_draft_field() == Some(field);
        let label_style = if active {
            Theme::field_label_active()
        } else {
            Theme::field_label()
        };
        lines.push(Line::from(Span::styled(label, label_style)));
        lines.extend(input_lines(value, placeholder, active));
        lines.push(Line::default());
    }
    lines
}

fn saved_comment_lines(comment: &CommentData) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(comment.author.clone(), Theme::text_bold()),
        Span::styled(format!(" · {}", comment.timestamp), Theme::text_muted()),
    ])];
    if let Some(url) = comment.video_context() {
        lines.push(Line::from(Span::styled(
            format!("{} {}", symbols::VIDEO, url),
            Theme::text_accent(),
        )));
    }
    lines.push(Line::default());
    lines.extend(
        comment
            .text
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Theme::text()))),
    );
    lines
}

fn render_reply(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    comment: &CommentData,
    focused: bool,
) {
    let workspace = &state.workspace;
    let editing = focused && state.active_draft_field() == Some(DraftField::Reply);
    let title = if comment.is_replied() {
        " Posted Reply "
    } else if workspace.reply_editable() {
        " Reply (editable) "
    } else {
        " Reply "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::TOP)
        .border_style(Theme::border())
        .style(Theme::main_bg());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = if workspace.generating {
        vec![Line::from(Span::styled(
            format!(
                "{} Drafting a {} reply...",
                spinner_char(),
                state.persona.profile.tone.as_str().to_lowercase()
            ),
            Theme::text_accent(),
        ))]
    } else if let Some(reply) = &workspace.reply
        && editing
    {
        input_lines(reply, "", true)
    } else if let Some(reply) = &workspace.reply {
        reply
            .lines()
            .map(|l| Line::from(Span::styled(l, Theme::text())))
            .collect()
    } else if comment.is_replied() {
        vec![Line::from(Span::styled(
            "Reply not available.",
            Theme::text_muted(),
        ))]
    } else {
        vec![Line::from(Span::styled(
            "Ctrl+g drafts a reply in your channel's voice",
            Theme::text_muted(),
        ))]
    };

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}
