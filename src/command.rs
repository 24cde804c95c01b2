//! Command types and parsing for command mode

use crate::input::KeybindingEntry;
use crate::types::Tone;

/// A pending command that requires user confirmation before execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingCommand {
    ClearSession,
}

impl PendingCommand {
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::ClearSession => "Clear all session history? (y/N)",
        }
    }
}

/// Result of command execution
#[derive(Debug, Clone)]
pub enum CommandResult {
    Success(String),
    Error(String),
    ShowHelp(Vec<CommandHelp>),
    ShowKeys(Vec<KeybindingEntry>),
}

/// Help information for a command
#[derive(Debug, Clone)]
pub struct CommandHelp {
    pub name: &'static str,
    pub description: &'static str,
}

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Analyze,
    Clear,
    Help,
    Keys,
    Login,
    Logout,
    Quit,
    Tone(Tone),
}

/// Parse a command string into a ParsedCommand
pub fn parse_command(input: &str) -> Option<ParsedCommand> {
    let trimmed = input.trim();
    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (trimmed, ""),
    };

    match (name, arg) {
        ("analyze", "") => Some(ParsedCommand::Analyze),
        ("clear", "") => Some(ParsedCommand::Clear),
        ("help" | "h" | "?", "") => Some(ParsedCommand::Help),
        ("keys" | "keybindings" | "bindings", "") => Some(ParsedCommand::Keys),
        ("login", "") => Some(ParsedCommand::Login),
        ("logout", "") => Some(ParsedCommand::Logout),
        ("q" | "quit", "") => Some(ParsedCommand::Quit),
        ("tone", tone) => Tone::from_label(tone).map(ParsedCommand::Tone),
        _ => None,
    }
}

/// Get all available commands for help display
pub fn available_commands() -> Vec<CommandHelp> {
    vec![
        CommandHelp {
            name: "analyze",
            description: "Research the channel in the persona name field",
        },
        CommandHelp {
            name: "clear",
            description: "Clear session history (requires confirmation)",
        },
        CommandHelp {
            name: "help",
            description: "Show this help message",
        },
        CommandHelp {
            name: "keys",
            description: "Show all keybindings",
        },
        CommandHelp {
            name: "login",
            description: "Sign in with Google",
        },
        CommandHelp {
            name: "logout",
            description: "Sign out",
        },
        CommandHelp {
            name: "quit",
            description: "Exit the application",
        },
        CommandHelp {
            name: "tone <name>",
            description: "Set the persona tone (friendly, professional, humorous, sarcastic, hype)",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("clear"), Some(ParsedCommand::Clear));
        assert_eq!(parse_command("  q "), Some(ParsedCommand::Quit));
        assert_eq!(parse_command("?"), Some(ParsedCommand::Help));
        assert_eq!(parse_command("logout"), Some(ParsedCommand::Logout));
        assert_eq!(parse_command("nope"), None);
        assert_eq!(parse_command("clear now"), None);
    }

    #[test]
    fn test_parse_tone_argument() {
        assert_eq!(
            parse_command("tone sarcastic"),
            Some(ParsedCommand::Tone(Tone::Sarcastic))
        );
        assert_eq!(
            parse_command("tone   HYPE"),
            Some(ParsedCommand::Tone(Tone::Hype))
        );
        assert_eq!(parse_command("tone angry"), None);
        assert_eq!(parse_command("tone"), None);
    }
}
