use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{insights, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RankingDashboardApp {
    pub state: AppState,
}

impl RankingDashboardApp {
    /// Build the app and try the configured data file once.
    pub fn new(config: DashboardConfig) -> Self {
        let data_path = config.data_path.clone();
        let mut state = AppState::new(config);
        // Errors land in the status line; the user can still pick a file.
        if let Err(e) = state.open(&data_path) {
            log::debug!("Start-up load of {} failed: {e}", data_path.display());
        }
        Self { state }
    }
}

impl eframe::App for RankingDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: cards, charts, insights, raw table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.table.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a ranking file to begin  (File → Open…)");
                });
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    insights::summary_cards(ui, &self.state);
                    ui.separator();
                    plot::metric_chart(ui, &mut self.state);
                    ui.separator();
                    plot::comparison_chart(ui, &mut self.state);
                    ui.separator();
                    insights::insight_blocks(ui, &self.state);
                    ui.separator();
                    table::raw_table(ui, &self.state);
                });
        });
    }
}
