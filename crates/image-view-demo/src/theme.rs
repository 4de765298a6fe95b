//! Color palette and style constants for the gallery.

use ratatui::style::{Color, Modifier, Style};

pub const C_BG: Color = Color::Rgb(18, 18, 18);
pub const C_ACCENT: Color = Color::Rgb(255, 95, 95);
pub const C_PLAYING: Color = Color::Rgb(80, 200, 120);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_PANEL_BORDER_LOADING: Color = Color::Rgb(120, 100, 200);
pub const C_BADGE_PENDING: Color = Color::Rgb(255, 184, 80);

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_title() -> Style {
    Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
}

pub fn style_tile_border(loading: bool) -> Style {
    if loading {
        Style::default().fg(C_PANEL_BORDER_LOADING)
    } else {
        Style::default().fg(C_PANEL_BORDER)
    }
}
