// Colour palettes for the popup. The dark palette keeps the muted, low-contrast
// look; the light one mirrors it for light terminals.

use ratatui::style::{Color, Modifier, Style};
use tabhop_core::models::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg_app: Color,
    /// Active row background
    pub bg_selected: Color,
    /// Matched title fragment background
    pub bg_match: Color,
    pub text_primary: Color,
    pub text_muted: Color,
    pub accent_primary: Color,
    /// Tab marker
    pub accent_tab: Color,
    /// Bookmark marker
    pub accent_bookmark: Color,
    /// Rows marked for closing
    pub accent_error: Color,
    pub border: Color,
}

pub const DARK: Palette = Palette {
    bg_app: Color::Rgb(0, 0, 0),
    bg_selected: Color::Rgb(32, 32, 32),
    bg_match: Color::Rgb(60, 55, 30),
    text_primary: Color::Rgb(220, 220, 220),
    text_muted: Color::Rgb(128, 128, 128),
    accent_primary: Color::Rgb(86, 156, 214),
    accent_tab: Color::Rgb(106, 153, 85),
    accent_bookmark: Color::Rgb(197, 134, 192),
    accent_error: Color::Rgb(204, 102, 102),
    border: Color::Rgb(50, 50, 50),
};

pub const LIGHT: Palette = Palette {
    bg_app: Color::Rgb(250, 250, 250),
    bg_selected: Color::Rgb(225, 230, 240),
    bg_match: Color::Rgb(250, 235, 150),
    text_primary: Color::Rgb(30, 30, 30),
    text_muted: Color::Rgb(110, 110, 110),
    accent_primary: Color::Rgb(0, 95, 184),
    accent_tab: Color::Rgb(40, 120, 40),
    accent_bookmark: Color::Rgb(140, 60, 140),
    accent_error: Color::Rgb(180, 40, 40),
    border: Color::Rgb(200, 200, 200),
};

impl Palette {
    /// Palette for a theme preference; `System` is resolved via `COLORFGBG`
    pub fn for_theme(theme: Theme) -> Self {
        let colorfgbg = std::env::var("COLORFGBG").ok();
        match theme.resolve(colorfgbg.as_deref()) {
            Theme::Light => LIGHT,
            _ => DARK,
        }
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .bg(self.bg_match)
            .add_modifier(Modifier::BOLD)
    }

    pub fn marked(&self) -> Style {
        Style::default()
            .fg(self.accent_error)
            .add_modifier(Modifier::CROSSED_OUT)
    }
}
