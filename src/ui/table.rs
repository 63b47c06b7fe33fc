use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::format_metric;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 20.0;

/// Raw rows of the filtered view, all columns.
pub fn raw_table(ui: &mut Ui, state: &AppState) {
    ui.heading("📋 Selected data");

    let table = &state.filtered;
    if table.is_empty() {
        ui.label(RichText::new("No rows match the current filters.").weak());
        return;
    }

    ui.push_id("raw_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(true)
            .max_scroll_height(350.0)
            .column(Column::auto())
            .column(Column::auto().at_least(120.0))
            .columns(Column::auto().at_least(60.0), table.columns.len())
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong(&table.year_column);
                });
                header.col(|ui| {
                    ui.strong(&table.program_column);
                });
                for name in &table.columns {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.len(), |mut row| {
                    let record = &table.records[row.index()];
                    row.col(|ui| {
                        ui.label(record.year.to_string());
                    });
                    row.col(|ui| {
                        ui.label(&record.program);
                    });
                    for name in &table.columns {
                        row.col(|ui| {
                            ui.label(format_metric(record.metric(name)));
                        });
                    }
                });
            });
    });
}
