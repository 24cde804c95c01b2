//! Centralized theming for the tubereply TUI
//!
//! This module provides a single source of truth for all colors and styles
//! used throughout the application.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;
use std::sync::RwLock;

use crate::config::ThemeVariant;

/// Global theme variant storage
static THEME_VARIANT: RwLock<ThemeVariant> = RwLock::new(ThemeVariant::Modern);

/// Initialize the theme variant (call once at startup)
pub fn init_theme(variant: ThemeVariant) {
    if let Ok(mut guard) = THEME_VARIANT.write() {
        *guard = variant;
    }
}

/// Get the current theme variant
pub fn current_theme() -> ThemeVariant {
    THEME_VARIANT.read().map(|g| *g).unwrap_or_default()
}

/// Catppuccin Mocha color palette for the Modern theme
mod catppuccin {
    use super::Color;

    // Background layers (darkest to lightest)
    pub const BASE: Color = Color::Rgb(30, 30, 46); // #1e1e2e - main background
    pub const MANTLE: Color = Color::Rgb(24, 24, 37); // #181825 - status bar, panels
    pub const SURFACE0: Color = Color::Rgb(49, 50, 68); // #313244 - borders
    pub const SURFACE1: Color = Color::Rgb(69, 71, 90); // #45475a - selection

    // Text colors
    pub const TEXT: Color = Color::Rgb(205, 214, 244); // #cdd6f4 - primary
    pub const SUBTEXT1: Color = Color::Rgb(186, 194, 222); // #bac2de - secondary
    pub const OVERLAY0: Color = Color::Rgb(108, 112, 134); // #6c7086 - muted/disabled

    // Accent colors
    pub const LAVENDER: Color = Color::Rgb(180, 190, 254); // #b4befe - focused borders
    pub const BLUE: Color = Color::Rgb(137, 180, 250); // #89b4fa - links, accent
    pub const GREEN: Color = Color::Rgb(166, 227, 161); // #a6e3a1 - signed in, replied
    pub const YELLOW: Color = Color::Rgb(249, 226, 175); // #f9e2af - key hints, busy
    pub const PEACH: Color = Color::Rgb(250, 179, 135); // #fab387 - keyword tags
    pub const RED: Color = Color::Rgb(243, 139, 168); // #f38ba8 - errors
    pub const MAUVE: Color = Color::Rgb(203, 166, 247); // #cba6f7 - pending indicator
}

pub mod borders {
    use super::*;

    pub fn popup() -> BorderType {
        match current_theme() {
            ThemeVariant::Modern => BorderType::Rounded,
            ThemeVariant::Dark => BorderType::Plain,
            ThemeVariant::HighContrast => BorderType::Thick,
        }
    }

    pub fn panel() -> BorderType {
        match current_theme() {
            ThemeVariant::Modern => BorderType::Rounded,
            _ => BorderType::Plain,
        }
    }
}

pub mod colors {
    use super::*;

    pub fn bg_main() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::BASE,
            _ => Color::Reset,
        }
    }

    pub fn bg_status() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::MANTLE,
            ThemeVariant::Dark => Color::DarkGray,
            ThemeVariant::HighContrast => Color::Black,
        }
    }

    pub fn bg_selection() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::SURFACE1,
            ThemeVariant::Dark | ThemeVariant::HighContrast => Color::Blue,
        }
    }

    pub fn bg_error() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::RED,
            _ => Color::Red,
        }
    }

    pub fn fg_primary() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::TEXT,
            _ => Color::White,
        }
    }

    pub fn fg_on_error() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::MANTLE,
            _ => Color::White,
        }
    }

    pub fn fg_secondary() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::SUBTEXT1,
            ThemeVariant::Dark => Color::Gray,
            ThemeVariant::HighContrast => Color::White,
        }
    }

    pub fn fg_muted() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::OVERLAY0,
            ThemeVariant::Dark => Color::DarkGray,
            ThemeVariant::HighContrast => Color::Gray,
        }
    }

    pub fn fg_accent() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::BLUE,
            ThemeVariant::Dark => Color::Cyan,
            ThemeVariant::HighContrast => Color::LightCyan,
        }
    }

    pub fn fg_warning() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::YELLOW,
            ThemeVariant::Dark => Color::Yellow,
            ThemeVariant::HighContrast => Color::LightYellow,
        }
    }

    pub fn fg_success() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::GREEN,
            ThemeVariant::Dark => Color::Green,
            ThemeVariant::HighContrast => Color::LightGreen,
        }
    }

    pub fn fg_error() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::RED,
            ThemeVariant::Dark => Color::Red,
            ThemeVariant::HighContrast => Color::LightRed,
        }
    }

    pub fn pending_indicator() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::MAUVE,
            ThemeVariant::Dark => Color::Magenta,
            ThemeVariant::HighContrast => Color::LightMagenta,
        }
    }

    pub fn keyword_tag() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::PEACH,
            ThemeVariant::Dark => Color::Yellow,
            ThemeVariant::HighContrast => Color::LightYellow,
        }
    }

    pub fn border() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::SURFACE0,
            ThemeVariant::Dark => Color::DarkGray,
            ThemeVariant::HighContrast => Color::Gray,
        }
    }

    pub fn border_focused() -> Color {
        match current_theme() {
            ThemeVariant::Modern => catppuccin::LAVENDER,
            ThemeVariant::Dark => Color::Cyan,
            ThemeVariant::HighContrast => Color::LightCyan,
        }
    }
}

pub mod symbols {
    pub const PENDING: &str = "●";
    pub const REPLIED: &str = "↩";
    pub const SIGNED_IN: &str = "●";
    pub const SIGNED_OUT: &str = "○";
    pub const ERROR: &str = "!";
    pub const CURSOR: &str = "│";
    pub const TONE_PREV: &str = "◀";
    pub const TONE_NEXT: &str = "▶";
    pub const VIDEO: &str = "▷";
}

pub struct Theme;

impl Theme {
    // === Base ===

    pub fn main_bg() -> Style {
        Style::default().bg(colors::bg_main())
    }

    pub fn text() -> Style {
        Style::default()
            .fg(colors::fg_primary())
            .bg(colors::bg_main())
    }

    pub fn text_secondary() -> Style {
        Style::default()
            .fg(colors::fg_secondary())
            .bg(colors::bg_main())
    }

    pub fn text_muted() -> Style {
        Style::default()
            .fg(colors::fg_muted())
            .bg(colors::bg_main())
    }

    pub fn text_accent() -> Style {
        Style::default()
            .fg(colors::fg_accent())
            .bg(colors::bg_main())
    }

    pub fn text_bold() -> Style {
        Self::text().add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(colors::bg_selection())
            .fg(colors::fg_primary())
    }

    // === Borders ===

    pub fn border() -> Style {
        Style::default().fg(colors::border()).bg(colors::bg_main())
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(colors::border_focused())
            .bg(colors::bg_main())
    }

    // === Form fields ===

    pub fn field_label() -> Style {
        Self::text_secondary()
    }

    pub fn field_label_active() -> Style {
        Style::default()
            .fg(colors::border_focused())
            .bg(colors::bg_main())
            .add_modifier(Modifier::BOLD)
    }

    pub fn keyword_tag() -> Style {
        Style::default()
            .fg(colors::keyword_tag())
            .bg(colors::bg_main())
    }

    // === Session list ===

    pub fn tab_active() -> Style {
        Style::default()
            .fg(colors::fg_accent())
            .bg(colors::bg_main())
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn tab_inactive() -> Style {
        Self::text_muted()
    }

    pub fn pending_indicator() -> Style {
        Style::default()
            .fg(colors::pending_indicator())
            .bg(colors::bg_main())
    }

    pub fn replied_indicator() -> Style {
        Style::default()
            .fg(colors::fg_success())
            .bg(colors::bg_main())
    }

    // === Status / help / error bars ===

    pub fn status_bar() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_primary())
    }

    pub fn status_muted() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_muted())
    }

    pub fn status_busy() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_warning())
    }

    pub fn status_signed_in() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_success())
    }

    pub fn status_error() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_error())
            .add_modifier(Modifier::BOLD)
    }

    pub fn user_badge() -> Style {
        Style::default()
            .bg(colors::fg_accent())
            .fg(colors::bg_status())
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_bar() -> Style {
        Style::default()
            .bg(colors::bg_error())
            .fg(colors::fg_on_error())
    }

    pub fn help_key() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_warning())
    }

    pub fn help_desc() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_muted())
    }
}
