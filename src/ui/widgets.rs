//! Common UI widgets and utilities

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::{Theme, borders, symbols};

/// Bordered pane; the focused pane gets the accent border
pub fn pane_block<'a>(title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(borders::panel())
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .style(Theme::main_bg())
}

/// Lines of an editable text value with a trailing cursor when active.
///
/// An empty value shows the placeholder.
pub fn input_lines<'a>(value: &'a str, placeholder: &'a str, active: bool) -> Vec<Line<'a>> {
    if value.is_empty() {
        let mut spans = vec![];
        if active {
            spans.push(Span::styled(symbols::CURSOR, Theme::text_accent()));
        }
        spans.push(Span::styled(placeholder, Theme::text_muted()));
        return vec![Line::from(spans)];
    }

    let mut lines: Vec<Line> = value
        .split('\n')
        .map(|l| Line::from(Span::styled(l, Theme::text())))
        .collect();
    if active && let Some(last) = lines.last_mut() {
        last.push_span(Span::styled(symbols::CURSOR, Theme::text_accent()));
    }
    lines
}

pub fn error_bar(frame: &mut Frame, area: Rect, message: &str) {
    let style = Theme::error_bar();
    let paragraph = Paragraph::new(format!(" Error: {} ", message)).style(style);
    frame.render_widget(paragraph, area);
}

pub fn help_bar(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    if hints.is_empty() {
        return;
    }
    let available_width = area.width as usize;

    // Format: " key desc │" (separator between hints)
    let hint_widths: Vec<usize> = hints
        .iter()
        .enumerate()
        .map(|(i, (key, desc))| {
            let base = format!(" {} ", key).width() + desc.width();
            if i < hints.len() - 1 {
                base + 3 // " │ " separator
            } else {
                base + 1 // trailing space
            }
        })
        .collect();

    // Find how many hints we can fit
    let mut total_width = 0;
    let mut hints_to_show = 0;
    for width in &hint_widths {
        if total_width + width <= available_width {
            total_width += width;
            hints_to_show += 1;
        } else {
            break;
        }
    }

    // Show at least one hint if possible
    hints_to_show = hints_to_show.max(1).min(hints.len());

    let mut spans: Vec<Span> = Vec::new();
    for (i, (key, desc)) in hints.iter().take(hints_to_show).enumerate() {
        spans.push(Span::styled(format!(" {} ", key), Theme::help_key()));
        spans.push(Span::styled(desc.to_string(), Theme::help_desc()));
        if i < hints_to_show - 1 {
            spans.push(Span::styled(" │ ", Theme::help_desc()));
        }
    }
    spans.push(Span::styled(" ", Theme::help_desc()));

    let paragraph = Paragraph::new(Line::from(spans)).style(Theme::status_bar());
    frame.render_widget(paragraph, area);
}

/// Truncate to a display width, marking the cut with "..."
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return s.chars().take(max_width).collect();
    }

    let mut width = 0;
    let mut result = String::new();
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if width + char_width > max_width - 3 {
            break;
        }
        width += char_width;
        result.push(c);
    }
    result.push_str("...");
    result
}

/// First line of a possibly multi-line comment, for one-row previews
pub fn first_line(s: &str) -> &str {
    s.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim()
}
