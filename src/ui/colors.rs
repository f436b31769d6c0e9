//! Centralized color constants for the UI.
//!
//! This module provides consistent colors across all UI panels.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for secondary text.
    pub const LABEL: Color32 = Color32::from_rgb(120, 120, 130);
    /// Accent for the app title icon.
    pub const ACCENT: Color32 = Color32::from_rgb(100, 180, 255);
}

/// Colors for the map canvas.
pub mod map {
    use super::Color32;

    /// Fill tones for states. The fill carries no meaning; states pick one by index.
    pub const STATE_FILLS: &[Color32] = &[
        Color32::from_rgb(143, 177, 208),
        Color32::from_rgb(133, 168, 201),
        Color32::from_rgb(153, 186, 214),
    ];

    /// Resort marker fill.
    pub const MARKER: Color32 = Color32::RED;
    /// Resort marker outline.
    pub const MARKER_STROKE: Color32 = Color32::BLACK;

    pub fn state_fill(index: usize) -> Color32 {
        STATE_FILLS[index % STATE_FILLS.len()]
    }

    /// State outline color for the current theme.
    pub fn state_outline(dark_mode: bool) -> Color32 {
        if dark_mode {
            Color32::from_rgb(30, 30, 45)
        } else {
            Color32::WHITE
        }
    }

    /// Tooltip background - requires alpha, use function.
    pub fn tooltip_background() -> Color32 {
        Color32::from_rgba_unmultiplied(255, 255, 255, 240)
    }

    /// Tooltip border.
    pub const TOOLTIP_BORDER: Color32 = Color32::BLACK;
    /// Tooltip text.
    pub const TOOLTIP_TEXT: Color32 = Color32::from_rgb(20, 20, 20);
}

/// Colors for toast notifications.
pub mod toasts {
    use super::Color32;

    pub const INFO: Color32 = Color32::from_rgb(100, 180, 255);
    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 80, 80);
}
