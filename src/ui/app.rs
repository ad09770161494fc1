//! Main Chairside application struct and eframe integration

use crate::session::SessionHandle;
use crate::ui::components::{MessageList, RecordButton, StatusBar};
use crate::ui::theme::Theme;
use egui::{CentralPanel, RichText, TopBottomPanel};
use tracing::{info, warn};

/// Main Chairside application
pub struct ChairsideApp {
    /// Handle into the session driver thread
    session: SessionHandle,
    /// UI theme
    theme: Theme,
}

impl ChairsideApp {
    pub fn new(cc: &eframe::CreationContext<'_>, session: SessionHandle) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);
        info!("Chairside UI initialized");
        Self { session, theme }
    }
}

impl eframe::App for ChairsideApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let snapshot = self.session.snapshot();

        TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.label(
                RichText::new("Dental Intake Assistant")
                    .size(18.0)
                    .strong()
                    .color(self.theme.text_primary),
            );
            ui.add_space(6.0);
        });

        TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(self.theme.spacing_sm);
            StatusBar::new(
                &snapshot.view.status,
                snapshot.view.loader_visible,
                &self.theme,
            )
            .show(ui);
            ui.add_space(self.theme.spacing_sm);

            ui.vertical_centered(|ui| {
                if snapshot.view.record_visible {
                    let pressed = RecordButton::new(snapshot.state, &self.theme).show(ui);
                    if pressed {
                        if let Err(e) = self.session.press_record() {
                            warn!("Failed to send record command: {}", e);
                        }
                    }
                }

                if snapshot.view.summary_visible && ui.button("Generate Summary").clicked() {
                    if let Err(e) = self.session.press_summary() {
                        warn!("Failed to send summary command: {}", e);
                    }
                }
            });
            ui.add_space(self.theme.spacing_sm);
        });

        CentralPanel::default().show(ctx, |ui| {
            MessageList::new(&snapshot.messages, &self.theme).show(ui);
        });

        // The session thread mutates state between frames; keep polling
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
