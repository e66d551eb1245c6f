use std::collections::HashSet;

use ratatui::style::Color;

use super::ThemeName;

/// Concrete colors the ui layer paints with, resolved once at startup
/// from the configured theme name.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub muted: Color,
    pub faint: Color,
    pub tag: Color,
    pub category: Color,
    pub highlight: Color,
    pub danger: Color,
    pub selection_fg: Color,
    pub selection_bg: Color,
}

impl Theme {
    pub fn named(name: &ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self {
                accent: Color::Cyan,
                muted: Color::Gray,
                faint: Color::DarkGray,
                tag: Color::Green,
                category: Color::Magenta,
                highlight: Color::Yellow,
                danger: Color::Red,
                selection_fg: Color::Black,
                selection_bg: Color::Blue,
            },
            ThemeName::Light => Self {
                accent: Color::Blue,
                muted: Color::DarkGray,
                faint: Color::Gray,
                tag: Color::Green,
                category: Color::Magenta,
                highlight: Color::Red,
                danger: Color::Red,
                selection_fg: Color::White,
                selection_bg: Color::Blue,
            },
            ThemeName::HighContrast => Self {
                accent: Color::White,
                muted: Color::White,
                faint: Color::Gray,
                tag: Color::LightGreen,
                category: Color::LightMagenta,
                highlight: Color::LightYellow,
                danger: Color::LightRed,
                selection_fg: Color::Black,
                selection_bg: Color::White,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    names: HashSet<ThemeName>,
}

impl ThemeRegistry {
    pub fn contains(&self, theme: &ThemeName) -> bool {
        self.names.contains(theme)
    }

    pub fn all(&self) -> impl Iterator<Item = &ThemeName> {
        self.names.iter()
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        let names = [ThemeName::Dark, ThemeName::Light, ThemeName::HighContrast]
            .into_iter()
            .collect();
        Self { names }
    }
}
