use eframe::egui::{self, Color32, Frame, RichText, Ui};

use crate::color::direction_color;
use crate::data::model::format_metric;
use crate::data::trend::TrendRecord;
use crate::state::AppState;

const CARD_GREEN: Color32 = Color32::from_rgb(0x4C, 0xAF, 0x50);

// ---------------------------------------------------------------------------
// Summary cards
// ---------------------------------------------------------------------------

pub fn summary_cards(ui: &mut Ui, state: &AppState) {
    ui.heading("📌 Overview");

    let summary = state.filtered.summary();
    let cards = [
        (summary.programs, "Programs analysed"),
        (summary.years, "Years included"),
        (summary.rows, "Total records"),
    ];

    ui.columns(cards.len(), |cols| {
        for (col, (value, label)) in cols.iter_mut().zip(cards) {
            Frame::group(col.style())
                .corner_radius(12.0)
                .inner_margin(egui::Margin::same(16))
                .show(col, |ui: &mut Ui| {
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.label(
                            RichText::new(value.to_string())
                                .size(28.0)
                                .strong()
                                .color(CARD_GREEN),
                        );
                        ui.label(RichText::new(label).weak());
                    });
                });
        }
    });
}

// ---------------------------------------------------------------------------
// Automatic insights, one block per configured metric
// ---------------------------------------------------------------------------

pub fn insight_blocks(ui: &mut Ui, state: &AppState) {
    for (metric, trends) in &state.insights {
        ui.heading(format!("🧠 Automatic insights – {metric}"));
        if trends.is_empty() {
            ui.label(RichText::new("No programs selected.").weak());
        }
        for trend in trends {
            insight_line(ui, trend);
        }
        ui.add_space(8.0);
    }
}

fn insight_line(ui: &mut Ui, trend: &TrendRecord) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label(RichText::new(&trend.program).strong());
        match (trend.first_year, trend.last_year) {
            (Some(first), Some(last)) if trend.observations > 1 => {
                ui.label(format!(
                    "{} ({first}) → {} ({last})",
                    format_metric(trend.first_value),
                    format_metric(trend.last_value)
                ));
            }
            _ => {
                ui.label(format!("{} record(s)", trend.observations));
            }
        }
        ui.label(
            RichText::new(trend.direction.label())
                .strong()
                .color(direction_color(trend.direction)),
        );
    });
}
