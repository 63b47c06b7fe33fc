use eframe::egui::{self, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::data::model::format_metric;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 360.0;

// ---------------------------------------------------------------------------
// Metric over time, one line per program
// ---------------------------------------------------------------------------

pub fn metric_chart(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📈 Metrics over time");

    egui::ComboBox::from_id_salt("chart_metric")
        .selected_text(&state.selected_metric)
        .width(320.0)
        .show_ui(ui, |ui: &mut Ui| {
            for metric in &state.config.chart_metrics {
                ui.selectable_value(&mut state.selected_metric, metric.clone(), metric);
            }
        });

    let series = state.metric_series();
    let year_label = state.filtered.year_column.clone();

    Plot::new("metric_chart")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label(year_label)
        .y_axis_label(state.selected_metric.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (program, points) in series {
                let color = state.colors.color_for(&program);

                let line = Line::new(PlotPoints::from(points.clone()))
                    .name(&program)
                    .color(color)
                    .width(2.0);
                plot_ui.line(line);

                let markers = Points::new(PlotPoints::from(points))
                    .name(&program)
                    .color(color)
                    .radius(3.5);
                plot_ui.points(markers);
            }
        });
}

// ---------------------------------------------------------------------------
// Single-year comparison, one bar per program
// ---------------------------------------------------------------------------

pub fn comparison_chart(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🏆 Comparison between programs in one year");

    let Some(table) = state.table.clone() else {
        return;
    };

    let current = state
        .comparison_year
        .map(|y| y.to_string())
        .unwrap_or_default();
    egui::ComboBox::from_id_salt("comparison_year")
        .selected_text(current)
        .show_ui(ui, |ui: &mut Ui| {
            for year in table.years() {
                ui.selectable_value(&mut state.comparison_year, Some(year), year.to_string());
            }
        });

    let rows = state.comparison_bars();
    let labels: Vec<String> = rows.iter().map(|(program, _)| program.clone()).collect();

    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, (program, value))| {
            let value = (*value)?;
            Some(
                Bar::new(i as f64, value)
                    .name(format!("{program}: {}", format_metric(Some(value))))
                    .fill(state.colors.color_for(program))
                    .width(0.7),
            )
        })
        .collect();

    Plot::new("comparison_chart")
        .height(CHART_HEIGHT)
        .y_axis_label(state.config.comparison_metric.clone())
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}
