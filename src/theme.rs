//! Light/dark color themes
//!
//! The active theme is process-global, like the rest of the styling
//! helpers, and its name is the single piece of client-side state that
//! survives restarts (see [`crate::settings`]).

use ratatui::style::Color;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ThemeId {
    Light = 0,
    Dark = 1,
}

impl ThemeId {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ThemeId::Light => "light",
            ThemeId::Dark => "dark",
        }
    }

    /// Parse a persisted theme name; unknown names fall back to light
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => ThemeId::Dark,
            _ => ThemeId::Light,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            ThemeId::Light => ThemeId::Dark,
            ThemeId::Dark => ThemeId::Light,
        }
    }

    fn from_index(idx: usize) -> Self {
        match idx {
            1 => ThemeId::Dark,
            _ => ThemeId::Light,
        }
    }
}

static CURRENT_THEME_INDEX: AtomicUsize = AtomicUsize::new(0);

pub fn current_theme_id() -> ThemeId {
    ThemeId::from_index(CURRENT_THEME_INDEX.load(Ordering::Relaxed))
}

pub fn set_theme(theme: ThemeId) {
    CURRENT_THEME_INDEX.store(theme as usize, Ordering::Relaxed);
}

pub fn current_theme() -> &'static Palette {
    match current_theme_id() {
        ThemeId::Light => &LIGHT_PALETTE,
        ThemeId::Dark => &DARK_PALETTE,
    }
}

/// Color roles used by the panels and widgets
#[derive(Clone, Debug)]
pub struct Palette {
    pub bg: Color,
    pub panel_bg: Color,
    pub fg: Color,
    /// Secondary text: timestamps, hints, separators
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub accent: Color,
    pub user_msg: Color,
    pub assistant_msg: Color,
    pub system_msg: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
}

impl Palette {
    /// Text and border colors for a panel depending on focus
    #[must_use]
    pub fn panel_colors(&self, is_focused: bool) -> (Color, Color) {
        if is_focused {
            (self.fg, self.border_focused)
        } else {
            (self.muted, self.border)
        }
    }
}

static LIGHT_PALETTE: Palette = Palette {
    bg: Color::Rgb(0xFA, 0xFA, 0xF7),
    panel_bg: Color::Rgb(0xFF, 0xFF, 0xFF),
    fg: Color::Rgb(0x2B, 0x2B, 0x2B),
    muted: Color::Rgb(0x8A, 0x8A, 0x85),
    border: Color::Rgb(0xC8, 0xC8, 0xC2),
    border_focused: Color::Rgb(0x4A, 0x6F, 0xA5),
    accent: Color::Rgb(0x2F, 0x6F, 0xED),
    user_msg: Color::Rgb(0x1D, 0x4E, 0xD8),
    assistant_msg: Color::Rgb(0x2B, 0x2B, 0x2B),
    system_msg: Color::Rgb(0x6B, 0x72, 0x80),
    error: Color::Rgb(0xB4, 0x23, 0x18),
    success: Color::Rgb(0x1A, 0x7F, 0x37),
    warning: Color::Rgb(0x9A, 0x6A, 0x00),
    selection_bg: Color::Rgb(0xD6, 0xE4, 0xFF),
    selection_fg: Color::Rgb(0x1A, 0x1A, 0x1A),
};

static DARK_PALETTE: Palette = Palette {
    bg: Color::Rgb(0x1A, 0x1A, 0x1A),
    panel_bg: Color::Rgb(0x2D, 0x2D, 0x2D),
    fg: Color::Rgb(0xF0, 0xF0, 0xF0),
    muted: Color::Rgb(0xA0, 0xA0, 0xA0),
    border: Color::Rgb(0x44, 0x44, 0x44),
    border_focused: Color::Rgb(0x7A, 0xA2, 0xDF),
    accent: Color::Rgb(0x6C, 0xA0, 0xF5),
    user_msg: Color::Rgb(0x8A, 0xB4, 0xFF),
    assistant_msg: Color::Rgb(0xF0, 0xF0, 0xF0),
    system_msg: Color::Rgb(0x9C, 0xA3, 0xAF),
    error: Color::Rgb(0xF0, 0x6A, 0x5E),
    success: Color::Rgb(0x6B, 0xCB, 0x77),
    warning: Color::Rgb(0xE5, 0xC0, 0x7B),
    selection_bg: Color::Rgb(0x3A, 0x4A, 0x66),
    selection_fg: Color::Rgb(0xF0, 0xF4, 0xF8),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_names_round_trip() {
        assert_eq!(ThemeId::from_name(ThemeId::Dark.name()), ThemeId::Dark);
        assert_eq!(ThemeId::from_name(ThemeId::Light.name()), ThemeId::Light);
        assert_eq!(ThemeId::from_name("solarized"), ThemeId::Light);
    }

    #[test]
    fn toggle_alternates() {
        assert_eq!(ThemeId::Light.toggled(), ThemeId::Dark);
        assert_eq!(ThemeId::Dark.toggled(), ThemeId::Light);
    }
}
