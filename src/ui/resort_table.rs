//! Conditions table below the map.

use crate::data::ResortRecord;
use crate::ui::colors;
use eframe::egui::{self, RichText};

pub const HEADING: &str = "Your Daily Schnar Forecast";
pub const EMPTY_MESSAGE: &str =
    "Looks like there is nothing to ski right now! Is it summer already?";
pub const COLUMNS: [&str; 5] = [
    "Ski Resort",
    "State",
    "72 Hour Snowfall",
    "Conditions",
    "Trails Open",
];

/// Display cells for each record, in feed order.
pub fn table_rows(records: &[ResortRecord]) -> Vec<[String; 5]> {
    records
        .iter()
        .map(|r| {
            [
                r.name.clone(),
                r.state.clone(),
                r.snowfall_72h.clone(),
                r.base_depth.clone(),
                format!("{} Trails", r.trails_open),
            ]
        })
        .collect()
}

pub fn render_resort_table(ui: &mut egui::Ui, records: &[ResortRecord]) {
    ui.vertical_centered(|ui| {
        ui.heading(RichText::new(HEADING).strong());
    });
    ui.add_space(8.0);

    let rows = table_rows(records);
    if rows.is_empty() {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(EMPTY_MESSAGE).color(colors::ui::LABEL));
        });
        return;
    }

    egui::Grid::new("resort_table")
        .striped(true)
        .num_columns(COLUMNS.len())
        .spacing([24.0, 6.0])
        .show(ui, |ui| {
            for title in COLUMNS {
                ui.label(RichText::new(title).strong());
            }
            ui.end_row();

            for row in &rows {
                for cell in row {
                    ui.label(cell);
                }
                ui.end_row();
            }
        });
}
