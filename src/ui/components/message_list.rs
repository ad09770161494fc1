//! Message list component
//!
//! Displays the conversation log as sender-labeled bubbles, newest pinned
//! into view. Transcript text is rendered span by span so server content is
//! always data, never markup.

use crate::transcript::format::format_text;
use crate::transcript::{Message, Sender};
use crate::ui::theme::Theme;
use egui::{self, RichText};

/// Scrolling conversation log
pub struct MessageList<'a> {
    messages: &'a [Message],
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self { messages, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add_space(self.theme.spacing);
                for message in self.messages {
                    self.show_message(ui, message);
                    ui.add_space(self.theme.spacing_sm);
                }
                ui.add_space(self.theme.spacing);
            });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        let (label, fill) = match message.sender {
            Sender::User => ("You", self.theme.bg_user),
            Sender::Assistant => ("Assistant", self.theme.bg_secondary),
            Sender::Summary => ("Summary", self.theme.bg_summary),
        };

        egui::Frame::none()
            .fill(fill)
            .rounding(self.theme.bubble_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    RichText::new(label)
                        .size(11.0)
                        .color(self.theme.text_muted),
                );
                self.show_text(ui, &message.text);
            });
    }

    /// Render formatted spans: strong emphasis and line breaks only
    fn show_text(&self, ui: &mut egui::Ui, text: &str) {
        for line in format_text(text) {
            if line.is_empty() {
                ui.add_space(self.theme.spacing_sm);
                continue;
            }
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing.x = 0.0;
                for span in &line {
                    let rich = RichText::new(&span.text)
                        .size(14.0)
                        .color(self.theme.text_primary);
                    let rich = if span.strong { rich.strong() } else { rich };
                    ui.label(rich);
                }
            });
        }
    }
}
