//! Theme and styling definitions for the dashboard.

use ratatui::style::{Color, Modifier, Style};
use securesight_engine::IncidentKind;

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(17, 24, 39);
    pub const FG: Color = Color::Rgb(229, 231, 235);
    pub const DIM: Color = Color::Rgb(156, 163, 175);

    // Accent colors
    pub const ACCENT: Color = Color::Rgb(96, 165, 250);
    pub const SELECTED_BG: Color = Color::Rgb(29, 78, 216);

    // Status bar colors (high contrast)
    pub const STATUS_BG: Color = Color::Rgb(31, 41, 55);
    pub const STATUS_KEY_BG: Color = Color::Rgb(55, 65, 81);

    // Incident kinds
    pub const UNAUTHORISED: Color = Color::Rgb(239, 68, 68);
    pub const GUN: Color = Color::Rgb(249, 115, 22);
    pub const FACE: Color = Color::Rgb(59, 130, 246);
    pub const TRAFFIC: Color = Color::Rgb(234, 179, 8);
    pub const OTHER: Color = Color::Rgb(107, 114, 128);

    pub const RESOLVED: Color = Color::Rgb(74, 222, 128);
    pub const SCRUBBER: Color = Color::Rgb(250, 204, 21);

    // Border colors
    pub const BORDER: Color = Color::Rgb(55, 65, 81);
    pub const BORDER_ACTIVE: Color = Color::Rgb(96, 165, 250);
}

/// Color used for an incident kind in the list and on the timeline.
pub fn kind_color(kind: &IncidentKind) -> Color {
    match kind {
        IncidentKind::UnauthorisedAccess => Palette::UNAUTHORISED,
        IncidentKind::GunThreat => Palette::GUN,
        IncidentKind::FaceRecognised => Palette::FACE,
        IncidentKind::TrafficCongestion => Palette::TRAFFIC,
        IncidentKind::Other(_) => Palette::OTHER,
    }
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Highlighted list row.
    pub fn highlight() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Title style.
    pub fn title() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Count of unresolved incidents.
    pub fn alert() -> Style {
        Style::default()
            .fg(Palette::UNAUTHORISED)
            .add_modifier(Modifier::BOLD)
    }

    /// Resolved badge.
    pub fn resolved() -> Style {
        Style::default().fg(Palette::RESOLVED)
    }

    /// Scrubber column.
    pub fn scrubber() -> Style {
        Style::default()
            .fg(Palette::SCRUBBER)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint style (for status bar) - bright on dark for visibility.
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Palette::FG)
            .bg(Palette::STATUS_KEY_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Key hint label style - readable on status bar background.
    pub fn key_label() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Status bar background style.
    pub fn status_bar() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::STATUS_BG)
    }

    /// Border style for inactive elements.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER)
    }

    /// Border style for active/focused elements.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE)
    }
}
