//! Footer UI: credit line.

use crate::ui::colors;
use chrono::Datelike;
use eframe::egui::{self, RichText};

pub fn render_footer(ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("footer")
        .exact_height(28.0)
        .show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(credit_line(chrono::Local::now().year()))
                        .size(12.0)
                        .color(colors::ui::LABEL),
                );
            });
        });
}

fn credit_line(year: i32) -> String {
    format!("© {} Made by Shayon Keating", year)
}
