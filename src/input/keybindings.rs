use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Navigation
    Up,
    Down,
    NextFocus,
    PrevFocus,
    SwitchTab,
    Open,
    Back,
    NewDraft,

    // Form fields
    NextField,
    PrevField,
    ToneNext,
    TonePrev,
    KeywordPrev,
    KeywordNext,

    // Actions
    Analyze,
    Generate,
    Post,
    CopyReply,
    SaveDraft,
    ClearSession,
    Quit,

    // Account
    Login,
    Logout,

    // Command mode
    Command,
    ExecuteCommand,
    ConfirmCommand,
    CancelCommand,

    // Help
    Help, // Toggle help view
}

impl Action {
    /// Actions bound to chords that work even while typing in a field
    pub fn is_global(self) -> bool {
        matches!(
            self,
            Action::NextFocus
                | Action::PrevFocus
                | Action::Analyze
                | Action::Generate
                | Action::Post
                | Action::CopyReply
                | Action::SaveDraft
                | Action::ClearSession
                | Action::ToneNext
                | Action::Login
                | Action::Logout
        )
    }
}

pub struct KeyBindings {
    bindings: HashMap<KeyEvent, Action>,
}

/// A displayable keybinding entry
#[derive(Debug, Clone)]
pub struct KeybindingEntry {
    pub key: String,
    pub description: String,
    pub category: &'static str,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            bindings: Self::default_bindings(),
        }
    }

    pub fn get(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings.get(event).copied()
    }

    /// Get all keybindings as displayable entries grouped by category
    pub fn all_bindings(&self) -> Vec<KeybindingEntry> {
        let mut entries: Vec<_> = self
            .bindings
            .iter()
            .map(|(event, action)| KeybindingEntry {
                key: format_key_event(event),
                description: action_description(action),
                category: action_category(action),
            })
            .collect();

        // Sort by category first, then by description
        entries.sort_by(|a, b| {
            let cat_order = category_order(a.category).cmp(&category_order(b.category));
            if cat_order == std::cmp::Ordering::Equal {
                a.description.cmp(&b.description)
            } else {
                cat_order
            }
        });
        entries
    }

    fn default_bindings() -> HashMap<KeyEvent, Action> {
        let mut map = HashMap::new();

        // Navigation (session list)
        map.insert(key('j'), Action::Down);
        map.insert(key('k'), Action::Up);
        map.insert(key_code(KeyCode::Down), Action::Down);
        map.insert(key_code(KeyCode::Up), Action::Up);
        map.insert(key('h'), Action::SwitchTab);
        map.insert(key('l'), Action::SwitchTab);
        map.insert(key_code(KeyCode::Left), Action::SwitchTab);
        map.insert(key_code(KeyCode::Right), Action::SwitchTab);
        map.insert(key_code(KeyCode::Enter), Action::Open);
        map.insert(key_code(KeyCode::Esc), Action::Back);
        map.insert(key('n'), Action::NewDraft);
        map.insert(key('q'), Action::Quit);
        map.insert(key(':'), Action::Command);
        map.insert(key('?'), Action::Help);

        // Panes
        map.insert(key_code(KeyCode::Tab), Action::NextFocus);
        map.insert(shift_key_code(KeyCode::BackTab), Action::PrevFocus);

        // Actions (work from any pane)
        map.insert(ctrl_key('a'), Action::Analyze);
        map.insert(ctrl_key('g'), Action::Generate);
        map.insert(ctrl_key('p'), Action::Post);
        map.insert(ctrl_key('y'), Action::CopyReply);
        map.insert(ctrl_key('s'), Action::SaveDraft);
        map.insert(ctrl_key('x'), Action::ClearSession);
        map.insert(ctrl_key('t'), Action::ToneNext);
        map.insert(ctrl_key('q'), Action::Quit);

        // Account
        map.insert(ctrl_key('l'), Action::Login);
        map.insert(ctrl_key('o'), Action::Logout);

        // Help
        map.insert(key_code(KeyCode::F(1)), Action::Help);

        map
    }
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn shift_key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::SHIFT)
}

/// Format a KeyEvent for display
fn format_key_event(event: &KeyEvent) -> String {
    let mut parts = Vec::new();

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl+");
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt+");
    }

    let key_str = match event.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => format!("{:?}", event.code),
    };

    format!("{}{}", parts.join(""), key_str)
}

/// Get a human-readable description for an action
fn action_description(action: &Action) -> String {
    match action {
        Action::Up => "Move up".to_string(),
        Action::Down => "Move down".to_string(),
        Action::NextFocus => "Next pane".to_string(),
        Action::PrevFocus => "Previous pane".to_string(),
        Action::SwitchTab => "Switch Drafts / Replied".to_string(),
        Action::Open => "Open comment".to_string(),
        Action::Back => "Back to new comment".to_string(),
        Action::NewDraft => "New comment".to_string(),
        Action::NextField => "Next field".to_string(),
        Action::PrevField => "Previous field".to_string(),
        Action::ToneNext => "Cycle tone".to_string(),
        Action::TonePrev => "Cycle tone backwards".to_string(),
        Action::KeywordPrev => "Highlight previous keyword".to_string(),
        Action::KeywordNext => "Highlight next keyword".to_string(),
        Action::Analyze => "Analyze channel (AI)".to_string(),
        Action::Generate => "Generate / regenerate reply (AI)".to_string(),
        Action::Post => "Post reply".to_string(),
        Action::CopyReply => "Copy reply to clipboard".to_string(),
        Action::SaveDraft => "Save comment as draft".to_string(),
        Action::ClearSession => "Clear session history".to_string(),
        Action::Quit => "Quit".to_string(),
        Action::Login => "Sign in with Google".to_string(),
        Action::Logout => "Sign out".to_string(),
        Action::Command => "Enter command mode".to_string(),
        Action::ExecuteCommand => "Execute command".to_string(),
        Action::ConfirmCommand => "Confirm command".to_string(),
        Action::CancelCommand => "Cancel command".to_string(),
        Action::Help => "Toggle help".to_string(),
    }
}

/// Get the category for an action
fn action_category(action: &Action) -> &'static str {
    match action {
        Action::Up
        | Action::Down
        | Action::NextFocus
        | Action::PrevFocus
        | Action::SwitchTab
        | Action::Open
        | Action::Back
        | Action::NewDraft => "Navigation",

        Action::NextField
        | Action::PrevField
        | Action::ToneNext
        | Action::TonePrev
        | Action::KeywordPrev
        | Action::KeywordNext => "Persona",

        Action::Analyze
        | Action::Generate
        | Action::Post
        | Action::CopyReply
        | Action::SaveDraft
        | Action::ClearSession
        | Action::Quit => "Actions",

        Action::Login | Action::Logout => "Account",

        Action::Command
        | Action::ExecuteCommand
        | Action::ConfirmCommand
        | Action::CancelCommand => "Commands",

        Action::Help => "Help",
    }
}

/// Get sort order for categories
fn category_order(category: &str) -> u8 {
    match category {
        "Navigation" => 0,
        "Actions" => 1,
        "Persona" => 2,
        "Account" => 3,
        "Commands" => 4,
        "Help" => 5,
        _ => 99,
    }
}
