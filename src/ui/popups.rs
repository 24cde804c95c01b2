//! Modal overlays: command bar, help popup, missing API key notice

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::app::state::AppState;
use crate::command::{CommandHelp, CommandResult};
use crate::config::Config;
use crate::input::KeybindingEntry;

use super::components::centered_rect_constrained;
use super::theme::{Theme, borders};

pub fn render_command_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let input = state.modal.command_input().unwrap_or("");

    // Confirmation mode - show the prompt from command_result
    if state.modal.pending_confirmation().is_some() {
        if let Some(CommandResult::Success(msg)) = state.modal.command_result() {
            let paragraph = Paragraph::new(format!(" {} ", msg)).style(Theme::status_bar());
            frame.render_widget(paragraph, area);
        }
        return;
    }

    let line = match state.modal.command_result() {
        Some(CommandResult::Success(msg)) => Line::from(vec![
            Span::styled(format!(" :{}│ ", input), Theme::status_bar()),
            Span::styled(msg.clone(), Theme::status_muted()),
        ]),
        Some(CommandResult::Error(msg)) => Line::from(vec![
            Span::styled(format!(" :{}│ ", input), Theme::status_bar()),
            Span::styled(msg.clone(), Theme::status_error()),
        ]),
        // Listings are shown as a popup
        _ => Line::from(Span::styled(format!(" :{}│", input), Theme::status_bar())),
    };
    frame.render_widget(Paragraph::new(line).style(Theme::status_bar()), area);
}

/// Render the unified help popup (keybindings + commands)
pub fn render_help_popup(
    frame: &mut Frame,
    area: Rect,
    keys: &[KeybindingEntry],
    commands: &[CommandHelp],
    scroll: usize,
) {
    // Count unique categories to calculate height
    let mut categories: Vec<&str> = Vec::new();
    for key in keys {
        if categories.last() != Some(&key.category) {
            categories.push(key.category);
        }
    }

    let keybinding_lines = keys.len() + categories.len() * 2;
    let command_lines = if commands.is_empty() {
        0
    } else {
        commands.len() + 2
    };
    let content_height = (keybinding_lines + command_lines + 2) as u16;

    let popup_area = centered_rect_constrained(area, 40, 64, 8, content_height);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Help ")
        .title_bottom(" j/k scroll │ ? or Esc close ")
        .borders(Borders::ALL)
        .border_type(borders::popup())
        .border_style(Theme::border_focused())
        .style(Theme::main_bg());

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut items: Vec<ListItem> = Vec::new();
    let mut current_category: Option<&str> = None;
    let key_width = 14;

    // Keybindings grouped by category
    for entry in keys {
        if current_category != Some(entry.category) {
            if current_category.is_some() {
                items.push(ListItem::new(Line::from("")));
            }
            items.push(ListItem::new(section_header(entry.category, inner.width)));
            current_category = Some(entry.category);
        }

        let key_display = if entry.key.chars().count() > key_width {
            entry.key.chars().take(key_width).collect::<String>()
        } else {
            format!("{:width$}", entry.key, width = key_width)
        };

        items.push(ListItem::new(Line::from(vec![
            Span::styled("  ", Style::default()),
            Span::styled(key_display, Theme::text_accent()),
            Span::styled(entry.description.clone(), Theme::text()),
        ])));
    }

    if !commands.is_empty() {
        if !keys.is_empty() {
            items.push(ListItem::new(Line::from("")));
        }
        items.push(ListItem::new(section_header("Commands", inner.width)));

        let cmd_width = key_width;
        for cmd in commands {
            let cmd_display = format!(":{:<width$}", cmd.name, width = cmd_width - 1);
            items.push(ListItem::new(Line::from(vec![
                Span::styled("  ", Style::default()),
                Span::styled(cmd_display, Theme::text_accent()),
                Span::styled(cmd.description, Theme::text()),
            ])));
        }
    }

    let visible_items: Vec<ListItem> = items.into_iter().skip(scroll).collect();
    frame.render_widget(List::new(visible_items), inner);
}

fn section_header(title: &str, width: u16) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("── {} ", title),
            Theme::text_secondary().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "─".repeat(width.saturating_sub(title.chars().count() as u16 + 4) as usize),
            Theme::border(),
        ),
    ])
}

/// Shown instead of the main view when no Gemini API key is configured
pub fn render_missing_api_key(frame: &mut Frame, area: Rect) {
    let config_path = Config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "config.toml".to_string());

    let popup_area = centered_rect_constrained(area, 40, 72, 10, 14);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" API Key Missing ")
        .borders(Borders::ALL)
        .border_type(borders::popup())
        .border_style(Style::default().fg(super::theme::colors::fg_error()))
        .style(Theme::main_bg());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let lines = vec![
        Line::from(Span::styled(
            "TubeReply needs a Gemini API key to analyze channels and draft replies.",
            Theme::text_bold(),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Set TUBEREPLY_API_KEY or GEMINI_API_KEY, or add:",
            Theme::text(),
        )),
        Line::default(),
        Line::from(Span::styled("  [gemini]", Theme::text_accent())),
        Line::from(Span::styled("  api_key = \"...\"", Theme::text_accent())),
        Line::default(),
        Line::from(vec![
            Span::styled("to ", Theme::text()),
            Span::styled(config_path, Theme::text_secondary()),
        ]),
        Line::default(),
        Line::from(Span::styled("Press q to quit", Theme::text_muted())),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}
