//! Record button component
//!
//! Circular button that toggles recording. Idle shows a mic glyph,
//! recording shows a stop square over a red fill.

use crate::session::InteractionState;
use crate::ui::theme::Theme;
use egui::{Color32, Rect, Sense, Vec2};

/// Record button for voice input
pub struct RecordButton<'a> {
    state: InteractionState,
    theme: &'a Theme,
}

impl<'a> RecordButton<'a> {
    pub fn new(state: InteractionState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// Show the button; returns true when activated this frame
    pub fn show(self, ui: &mut egui::Ui) -> bool {
        let size = Vec2::new(60.0, 60.0);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            self.paint(ui, rect, &response);
        }

        let response = response.on_hover_text(match self.state {
            InteractionState::Recording => "Stop recording",
            _ => "Start recording",
        });

        response.clicked()
    }

    fn paint(&self, ui: &egui::Ui, rect: Rect, response: &egui::Response) {
        let painter = ui.painter();
        let is_recording = self.state.is_recording();

        let bg_color = if is_recording {
            self.theme.recording
        } else if response.hovered() {
            self.theme.primary.gamma_multiply(1.2)
        } else {
            self.theme.primary
        };

        painter.circle_filled(rect.center(), 28.0, bg_color);

        if is_recording {
            self.draw_stop_icon(painter, rect.center());
        } else {
            self.draw_mic_icon(painter, rect.center());
        }
    }

    fn draw_stop_icon(&self, painter: &egui::Painter, center: egui::Pos2) {
        painter.rect_filled(
            Rect::from_center_size(center, Vec2::splat(16.0)),
            2.0,
            Color32::WHITE,
        );
    }

    fn draw_mic_icon(&self, painter: &egui::Painter, center: egui::Pos2) {
        let color = Color32::WHITE;

        // Capsule body
        painter.rect_filled(
            Rect::from_center_size(center + Vec2::new(0.0, -4.0), Vec2::new(10.0, 16.0)),
            5.0,
            color,
        );
        // Stand
        painter.line_segment(
            [center + Vec2::new(0.0, 6.0), center + Vec2::new(0.0, 12.0)],
            egui::Stroke::new(2.0, color),
        );
        painter.line_segment(
            [
                center + Vec2::new(-6.0, 12.0),
                center + Vec2::new(6.0, 12.0),
            ],
            egui::Stroke::new(2.0, color),
        );
    }
}
