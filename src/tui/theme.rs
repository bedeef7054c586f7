//! Colour palettes for the two themes.

use ratatui::style::{Color, Modifier, Style};

use crate::core::conversation::Role;
use crate::core::preferences::Theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub user: Color,
    pub assistant: Color,
    pub selection: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: Color::White,
                foreground: Color::Black,
                muted: Color::Gray,
                accent: Color::Magenta,
                user: Color::Blue,
                assistant: Color::Green,
                selection: Color::LightBlue,
            },
            Theme::Dark => Self {
                background: Color::Black,
                foreground: Color::White,
                muted: Color::DarkGray,
                accent: Color::Yellow,
                user: Color::Cyan,
                assistant: Color::LightGreen,
                selection: Color::Cyan,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn dim(&self) -> Style {
        self.base().fg(self.muted)
    }

    pub fn role(&self, role: Role) -> Style {
        let fg = match role {
            Role::User => self.user,
            Role::Assistant => self.assistant,
        };
        self.base().fg(fg)
    }

    pub fn highlight(&self) -> Style {
        self.base()
            .fg(self.selection)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }
}
