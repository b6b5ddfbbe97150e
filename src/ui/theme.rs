//! Rose Pine palette and the handful of styles built from it

use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    pub const BASE: Color = Color::Rgb(25, 23, 36);
    pub const SURFACE: Color = Color::Rgb(31, 29, 46);
    pub const TEXT: Color = Color::Rgb(224, 222, 244);
    pub const SUBTLE: Color = Color::Rgb(144, 140, 170);
    pub const MUTED: Color = Color::Rgb(110, 106, 134);
    pub const LOVE: Color = Color::Rgb(235, 111, 146);
    pub const GOLD: Color = Color::Rgb(246, 193, 119);
    pub const ROSE: Color = Color::Rgb(235, 188, 186);
    pub const FOAM: Color = Color::Rgb(156, 207, 216);
    pub const IRIS: Color = Color::Rgb(196, 167, 231);
    pub const HIGHLIGHT_HIGH: Color = Color::Rgb(82, 79, 103);
    pub const HIGHLIGHT_LOW: Color = Color::Rgb(33, 32, 46);

    pub fn border() -> Style {
        Style::default().fg(Self::HIGHLIGHT_HIGH)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED)
    }

    pub fn section_title() -> Style {
        Style::default().fg(Self::IRIS).add_modifier(Modifier::BOLD)
    }

    pub fn link() -> Style {
        Style::default()
            .fg(Self::FOAM)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Self::LOVE)
            .bg(Self::HIGHLIGHT_LOW)
            .add_modifier(Modifier::BOLD)
    }

    pub fn code() -> Style {
        Style::default().fg(Self::GOLD).bg(Self::SURFACE)
    }
}
