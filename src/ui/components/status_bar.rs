//! Status bar component
//!
//! Shows the status line and a spinner while a turn or summary fetch is
//! in flight.

use crate::ui::theme::Theme;
use egui::RichText;

/// Status line with optional loading indicator
pub struct StatusBar<'a> {
    status: &'a str,
    loading: bool,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(status: &'a str, loading: bool, theme: &'a Theme) -> Self {
        Self {
            status,
            loading,
            theme,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.loading {
                ui.spinner();
            }
            ui.label(
                RichText::new(self.status)
                    .size(13.0)
                    .color(self.theme.text_muted),
            );
        });
    }
}
