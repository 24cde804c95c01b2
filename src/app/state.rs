//! Application state types
//!
//! All state types live here to maintain clean dependency:
//! UI layer imports from app layer, not vice versa.

use crate::auth::AuthState;
use crate::command::{CommandHelp, CommandResult, PendingCommand};
use crate::constants::ERROR_TTL_SECS;
use crate::input::KeybindingEntry;
use crate::persona::PersonaEditor;
use crate::types::CommentData;
use crate::workspace::{Selection, Workspace};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Main,
    /// No Gemini API key; nothing else is usable
    MissingApiKey,
}

/// Pane that receives keyboard input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Persona,
    Inbox,
    Workspace,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Self::Persona => Self::Inbox,
            Self::Inbox => Self::Workspace,
            Self::Workspace => Self::Persona,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Persona => Self::Workspace,
            Self::Inbox => Self::Persona,
            Self::Workspace => Self::Inbox,
        }
    }
}

/// Text field of the reply workspace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DraftField {
    Author,
    #[default]
    Text,
    VideoUrl,
    /// The generated reply, editable until posted
    Reply,
}

const NEW_FIELDS: &[DraftField] = &[DraftField::Author, DraftField::Text, DraftField::VideoUrl];
const NEW_FIELDS_WITH_REPLY: &[DraftField] = &[
    DraftField::Author,
    DraftField::Text,
    DraftField::VideoUrl,
    DraftField::Reply,
];

/// Modal overlay state - only one can be active at a time
#[derive(Debug, Clone, Default)]
pub enum ModalState {
    #[default]
    None,
    Command {
        input: String,
        result: Option<CommandResult>,
        pending: Option<PendingCommand>,
    },
    Help {
        keybindings: Vec<KeybindingEntry>,
        commands: Vec<CommandHelp>,
        scroll: usize,
    },
}

impl ModalState {
    pub fn is_command(&self) -> bool {
        matches!(self, Self::Command { .. })
    }

    pub fn is_help(&self) -> bool {
        matches!(self, Self::Help { .. })
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Get command input if in command mode
    pub fn command_input(&self) -> Option<&str> {
        match self {
            Self::Command { input, .. } => Some(input),
            _ => None,
        }
    }

    pub fn command_result(&self) -> Option<&CommandResult> {
        match self {
            Self::Command { result, .. } => result.as_ref(),
            _ => None,
        }
    }

    /// Get pending confirmation if in command mode
    pub fn pending_confirmation(&self) -> Option<&PendingCommand> {
        match self {
            Self::Command { pending, .. } => pending.as_ref(),
            _ => None,
        }
    }
}

/// Error and status message state
#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub error: Option<String>,
    pub error_time: Option<std::time::Instant>,
    pub message: String,
    /// Persists after error bar expires - shown as indicator in status bar
    pub has_unacknowledged_error: bool,
}

impl StatusState {
    pub fn set_error(&mut self, error: impl ToString) {
        self.error = Some(error.to_string());
        self.error_time = Some(std::time::Instant::now());
        self.has_unacknowledged_error = true;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.error_time = None;
    }

    /// Call this on user input to dismiss the status bar indicator
    pub fn acknowledge_error(&mut self) {
        self.has_unacknowledged_error = false;
    }

    /// Clear error if TTL expired. Returns true if error was cleared.
    pub fn clear_error_if_expired(&mut self) -> bool {
        if let Some(time) = self.error_time
            && time.elapsed().as_secs() >= ERROR_TTL_SECS
        {
            self.clear_error();
            true
        } else {
            false
        }
    }

    pub fn set_message(&mut self, msg: impl ToString) {
        self.message = msg.to_string();
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub view: View,
    pub focus: Focus,
    pub draft_field: DraftField,

    pub persona: PersonaEditor,
    pub workspace: Workspace,
    pub auth: AuthState,

    /// Cursor within the visible items of the active tab
    pub inbox_cursor: usize,

    // Status state (error, status message)
    pub status: StatusState,

    // Modal overlay state (command, help)
    pub modal: ModalState,
}

impl AppState {
    pub fn new(view: View, auth: AuthState) -> Self {
        Self {
            view,
            auth,
            ..Default::default()
        }
    }

    /// Whether any remote call is outstanding (spinner, faster polling)
    pub fn is_busy(&self) -> bool {
        self.persona.analyzing || self.workspace.generating || self.auth.login_in_flight
    }

    /// Whether the focused pane is accepting typed text
    pub fn is_editing_text(&self) -> bool {
        match self.focus {
            Focus::Persona => true,
            Focus::Workspace => self.active_draft_field().is_some(),
            Focus::Inbox => false,
        }
    }

    /// Workspace fields open for typing, in display order
    pub fn draft_fields(&self) -> &'static [DraftField] {
        let reply = self.workspace.reply_editable();
        match (&self.workspace.selection, reply) {
            (Selection::New, true) => NEW_FIELDS_WITH_REPLY,
            (Selection::New, false) => NEW_FIELDS,
            (Selection::Comment(_), true) => &[DraftField::Reply],
            (Selection::Comment(_), false) => &[],
        }
    }

    /// Field receiving typed text. Falls back to the comment text (or the
    /// reply) when the remembered field is not editable right now.
    pub fn active_draft_field(&self) -> Option<DraftField> {
        let fields = self.draft_fields();
        if fields.contains(&self.draft_field) {
            Some(self.draft_field)
        } else if fields.contains(&DraftField::Text) {
            Some(DraftField::Text)
        } else {
            fields.first().copied()
        }
    }

    pub fn cycle_draft_field(&mut self, forward: bool) {
        let fields = self.draft_fields();
        let Some(pos) = self
            .active_draft_field()
            .and_then(|current| fields.iter().position(|f| *f == current))
        else {
            return;
        };
        let len = fields.len();
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        self.draft_field = fields[next];
    }

    /// Text buffer behind the active workspace field
    pub fn draft_text_mut(&mut self) -> Option<&mut String> {
        match self.active_draft_field()? {
            DraftField::Author => Some(&mut self.workspace.input.author),
            DraftField::Text => Some(&mut self.workspace.input.text),
            DraftField::VideoUrl => Some(&mut self.workspace.input.video_url),
            DraftField::Reply => self.workspace.reply_mut(),
        }
    }

    pub fn inbox_items(&self) -> Vec<&CommentData> {
        self.workspace.visible(self.workspace.tab)
    }

    pub fn comment_under_cursor(&self) -> Option<&CommentData> {
        self.inbox_items().get(self.inbox_cursor).copied()
    }

    pub fn move_down(&mut self) {
        let len = self.inbox_items().len();
        if self.inbox_cursor + 1 < len {
            self.inbox_cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.inbox_cursor = self.inbox_cursor.saturating_sub(1);
    }

    /// Keep the cursor inside the active tab after the list changed
    pub fn clamp_inbox_cursor(&mut self) {
        let len = self.inbox_items().len();
        self.inbox_cursor = self.inbox_cursor.min(len.saturating_sub(1));
    }

    // Delegate methods to StatusState
    pub fn set_error(&mut self, error: impl ToString) {
        self.status.set_error(error);
    }

    pub fn clear_error_if_expired(&mut self) -> bool {
        self.status.clear_error_if_expired()
    }

    pub fn acknowledge_error(&mut self) {
        self.status.acknowledge_error();
    }

    pub fn has_unacknowledged_error(&self) -> bool {
        self.status.has_unacknowledged_error
    }

    pub fn set_status(&mut self, msg: impl ToString) {
        self.status.set_message(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::InboxTab;

    fn state_with_pending(count: usize) -> AppState {
        let mut state = AppState::default();
        for i in 0..count {
            state.workspace.input.text = format!("comment {}", i);
            state.workspace.save_draft();
        }
        state
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut state = state_with_pending(2);
        state.move_down();
        state.move_down();
        assert_eq!(state.inbox_cursor, 1);
        state.move_up();
        state.move_up();
        assert_eq!(state.inbox_cursor, 0);
    }

    #[test]
    fn test_cursor_clamped_when_tab_shrinks() {
        let mut state = state_with_pending(3);
        state.inbox_cursor = 2;
        state.workspace.tab = InboxTab::Replied;
        state.clamp_inbox_cursor();
        assert_eq!(state.inbox_cursor, 0);
        assert!(state.comment_under_cursor().is_none());
    }

    #[test]
    fn test_comment_under_cursor_is_newest_first() {
        let state = state_with_pending(2);
        assert_eq!(state.comment_under_cursor().unwrap().text, "comment 1");
    }

    #[test]
    fn test_workspace_is_read_only_for_saved_comments() {
        let mut state = state_with_pending(1);
        state.focus = Focus::Workspace;
        assert!(state.is_editing_text());

        let id = state.workspace.comments()[0].id.clone();
        state.workspace.select(Selection::Comment(id));
        assert!(!state.is_editing_text());
    }

    #[test]
    fn test_error_ttl_and_acknowledge() {
        let mut status = StatusState::default();
        status.set_error("boom");
        assert!(status.has_unacknowledged_error);
        assert!(!status.clear_error_if_expired());
        status.acknowledge_error();
        assert!(!status.has_unacknowledged_error);
        assert_eq!(status.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_reply_joins_field_cycle_once_generated() {
        let mut state = AppState {
            focus: Focus::Workspace,
            ..Default::default()
        };
        state.draft_field = DraftField::VideoUrl;
        state.cycle_draft_field(true);
        assert_eq!(state.draft_field, DraftField::Author);

        state.workspace.reply = Some("Thanks!".to_string());
        state.draft_field = DraftField::VideoUrl;
        state.cycle_draft_field(true);
        assert_eq!(state.draft_field, DraftField::Reply);
        state.draft_text_mut().unwrap().push_str(" <3");
        assert_eq!(state.workspace.reply.as_deref(), Some("Thanks! <3"));

        // Reply discarded: typing falls back to the comment text
        state.workspace.reply = None;
        assert_eq!(state.active_draft_field(), Some(DraftField::Text));
    }

    #[test]
    fn test_saved_comment_only_edits_its_reply() {
        let mut state = state_with_pending(1);
        state.focus = Focus::Workspace;
        let id = state.workspace.comments()[0].id.clone();
        state.workspace.select(Selection::Comment(id));
        assert!(state.draft_fields().is_empty());

        state.workspace.reply = Some("hi".to_string());
        assert!(state.is_editing_text());
        assert_eq!(state.active_draft_field(), Some(DraftField::Reply));
        state.cycle_draft_field(false);
        assert_eq!(state.draft_field, DraftField::Reply);
    }
}
