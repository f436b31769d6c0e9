//! Toast overlay in the bottom-right corner.

use crate::state::{Notifications, Toast};
use eframe::egui::{self, RichText};
use egui_phosphor::regular as icons;

pub fn render_toasts(ctx: &egui::Context, notifications: &mut Notifications) {
    if notifications.is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -40.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for toast in notifications.toasts() {
                if render_toast(ui, toast) {
                    dismissed = Some(toast.id);
                }
                ui.add_space(6.0);
            }
        });

    if let Some(id) = dismissed {
        notifications.dismiss(id);
    }
}

/// Returns `true` when the dismiss button was clicked.
fn render_toast(ui: &mut egui::Ui, toast: &Toast) -> bool {
    let color = toast.level.color();
    egui::Frame::popup(ui.style())
        .stroke(egui::Stroke::new(1.0, color))
        .show(ui, |ui| {
            ui.set_max_width(320.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new(toast.level.icon()).size(16.0).color(color));
                ui.label(&toast.message);
                ui.small_button(icons::X).clicked()
            })
            .inner
        })
        .inner
}
