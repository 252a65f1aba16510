//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Status;

// Each status column carries its own accent

pub const SLATE: Color = Color::Rgb(96, 108, 128);
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
pub const GOLD: Color = Color::Rgb(255, 215, 0);
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

/// Accent color of a status column.
pub fn status_color(status: Status) -> Color {
    match status {
        Status::Backlog => SLATE,
        Status::Open => Color::Blue,
        Status::InProgress => GOLD,
        Status::OnHold => DARK_PURPLE,
        Status::Completed => DARK_GREEN,
    }
}

/// Foreground that stays readable on top of `bg`.
pub fn text_on(bg: Color) -> Color {
    match bg {
        GOLD => Color::Rgb(20, 20, 20),
        _ => Color::White,
    }
}
