//! Theme and styling for the Chairside UI

use egui::{Color32, Rounding, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Primary accent color
    pub primary: Color32,
    /// Error color
    pub error: Color32,
    /// Recording indicator color
    pub recording: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_user: Color32,
    pub bg_summary: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_muted: Color32,

    /// Border radius for message bubbles
    pub bubble_rounding: Rounding,

    /// Standard spacing
    pub spacing: f32,
    /// Small spacing
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(99, 102, 241),   // Indigo
            error: Color32::from_rgb(239, 68, 68),      // Red
            recording: Color32::from_rgb(239, 68, 68),  // Red

            bg_primary: Color32::from_rgb(17, 24, 39),   // Dark blue-gray
            bg_secondary: Color32::from_rgb(31, 41, 55), // Lighter blue-gray
            bg_user: Color32::from_rgb(30, 58, 95),      // Blue tint
            bg_summary: Color32::from_rgb(41, 55, 31),   // Green tint

            text_primary: Color32::from_rgb(249, 250, 251), // Almost white
            text_muted: Color32::from_rgb(156, 163, 175),   // Medium gray

            bubble_rounding: Rounding::same(8.0),

            spacing: 12.0,
            spacing_sm: 6.0,
        }
    }

    /// Apply the theme to the egui context
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();
        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_primary;
        ctx.set_visuals(visuals);
    }
}
