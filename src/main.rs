mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::RankingDashboardApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load().unwrap_or_else(|e| {
        log::error!("{e}, using default configuration");
        DashboardConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Engineering Programs – Ranking Dashboard",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(RankingDashboardApp::new(config)))
        }),
    )
}
