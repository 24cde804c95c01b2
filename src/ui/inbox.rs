//! Session list pane with Drafts and Replied tabs

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use super::theme::{Theme, symbols};
use super::widgets::{first_line, pane_block, truncate_string};
use crate::app::state::AppState;
use crate::types::CommentData;
use crate::workspace::{InboxTab, Selection};

pub fn render_inbox(frame: &mut Frame, area: Rect, state: &AppState, focused: bool) {
    let workspace = &state.workspace;
    let tab = |tab: InboxTab, label: &str| {
        let style = if workspace.tab == tab {
            Theme::tab_active()
        } else {
            Theme::tab_inactive()
        };
        Span::styled(format!(" {} ({}) ", label, workspace.count(tab)), style)
    };
    let title = Line::from(vec![
        Span::raw(" "),
        tab(InboxTab::Pending, "Drafts"),
        Span::styled("│", Theme::border()),
        tab(InboxTab::Replied, "Replied"),
        Span::raw(" "),
    ]);

    let block = pane_block(title, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = state.inbox_items();
    if items.is_empty() {
        let msg = match workspace.tab {
            InboxTab::Pending => "No saved comments.\nCtrl+s keeps the current draft here.",
            InboxTab::Replied => "No replies posted yet.",
        };
        let paragraph = Paragraph::new(msg)
            .style(Theme::text_muted())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
        return;
    }

    let width = inner.width as usize;
    let list_items: Vec<ListItem> = items
        .iter()
        .map(|comment| {
            let open = workspace.selection == Selection::Comment(comment.id.clone());
            comment_item(comment, open, width)
        })
        .collect();

    let mut list_state = ListState::default().with_selected(focused.then_some(state.inbox_cursor));
    let list = List::new(list_items).highlight_style(Theme::selected());
    frame.render_stateful_widget(list, inner, &mut list_state);
}

fn comment_item(comment: &CommentData, open: bool, width: usize) -> ListItem<'static> {
    let (indicator, indicator_style) = if comment.is_replied() {
        (symbols::REPLIED, Theme::replied_indicator())
    } else {
        (symbols::PENDING, Theme::pending_indicator())
    };
    let author_style = if open {
        Theme::text_accent()
    } else {
        Theme::text_bold()
    };

    let header = Line::from(vec![
        Span::styled(format!("{} ", indicator), indicator_style),
        Span::styled(
            truncate_string(&comment.author, width.saturating_sub(16)),
            author_style,
        ),
        Span::styled(format!("  {}", comment.timestamp), Theme::text_muted()),
    ]);
    let preview = Line::from(Span::styled(
        format!(
            "  {}",
            truncate_string(first_line(&comment.text), width.saturating_sub(2))
        ),
        Theme::text_secondary(),
    ));

    let mut lines = vec![header, preview];
    if let Some(reply) = &comment.reply {
        lines.push(Line::from(Span::styled(
            format!(
                "  {} {}",
                symbols::REPLIED,
                truncate_string(first_line(reply), width.saturating_sub(4))
            ),
            Theme::text_muted(),
        )));
    }
    ListItem::new(lines)
}
