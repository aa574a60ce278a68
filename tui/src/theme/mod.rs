//! Theme and Colors
//!
//! A quiet, paper-and-ink palette. Poem text stays close to the terminal's
//! default foreground; color is reserved for chrome and AI enrichments.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Poem
// ============================================================================

/// Poem title - warm parchment
pub const TITLE_GOLD: Color = Color::Rgb(236, 200, 130);

/// Author line
pub const AUTHOR_GRAY: Color = Color::Rgb(160, 160, 170);

/// Poem body
pub const INK: Color = Color::Rgb(225, 225, 220);

// ============================================================================
// AI enrichments
// ============================================================================

/// Panel headings and enabled triggers
pub const ACCENT_INDIGO: Color = Color::Rgb(150, 140, 255);

/// Mood text
pub const MOOD_ROSE: Color = Color::Rgb(240, 150, 180);

/// Theme tags
pub const THEME_TEAL: Color = Color::Rgb(110, 200, 190);

// ============================================================================
// UI Colors
// ============================================================================

/// Hints, separators and disabled triggers
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Blocking error
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Non-blocking warning notice
pub const WARNING_AMBER: Color = Color::Rgb(255, 190, 80);

/// Informational notice
pub const INFO_BLUE: Color = Color::Rgb(100, 180, 255);

/// Style for a panel heading
pub fn heading() -> Style {
    Style::default()
        .fg(ACCENT_INDIGO)
        .add_modifier(Modifier::BOLD)
}

/// Style for a trigger label
pub fn trigger(enabled: bool) -> Style {
    if enabled {
        Style::default().fg(ACCENT_INDIGO)
    } else {
        Style::default().fg(DIM_GRAY)
    }
}
