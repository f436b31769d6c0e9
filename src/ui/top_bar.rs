//! Top bar UI: app title, status, and theme toggle.

use crate::state::AppState;
use crate::ui::colors;
use eframe::egui::{self, RichText};
use egui_phosphor::regular as icons;

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new(icons::SNOWFLAKE)
                        .size(18.0)
                        .color(colors::ui::ACCENT),
                );

                // App title
                ui.label(RichText::new("Schnar Map").strong().size(16.0));

                ui.separator();

                if state.feed.is_loading() {
                    ui.spinner();
                }

                // Status text
                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(colors::ui::LABEL),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (icon, hint) = if state.theme.dark_mode {
                        (icons::SUN, "Switch to light mode")
                    } else {
                        (icons::MOON, "Switch to dark mode")
                    };
                    if ui
                        .button(RichText::new(icon).size(16.0))
                        .on_hover_text(hint)
                        .clicked()
                    {
                        state.theme.toggle();
                        state.theme.save();
                        apply_theme(ctx, state.theme.dark_mode);
                    }
                });
            });
        });
}

/// Switches egui's visuals to match the theme preference.
pub fn apply_theme(ctx: &egui::Context, dark_mode: bool) {
    ctx.set_theme(if dark_mode {
        egui::Theme::Dark
    } else {
        egui::Theme::Light
    });
}
