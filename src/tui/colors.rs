//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, Status};

/// Accent for highlights, High priority and pending badges.
pub const ROSE: Color = Color::Rgb(239, 71, 111);
/// Medium priority.
pub const AMBER: Color = Color::Rgb(255, 209, 102);
/// Low priority and completed badges.
pub const MINT: Color = Color::Rgb(6, 214, 160);
/// Header and status bar background.
pub const SLATE: Color = Color::Rgb(47, 62, 70);
/// Dark text on light badges.
pub const INK: Color = Color::Rgb(51, 51, 51);

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => ROSE,
        Priority::Medium => AMBER,
        Priority::Low => MINT,
    }
}

pub fn status_color(status: Status) -> Color {
    match status {
        Status::Completed => MINT,
        Status::Pending => ROSE,
    }
}
