use anyhow::Result;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔎 Filters");
    ui.separator();

    let Some(table) = state.table.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    let years = table.years();
    let programs = table.programs();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Years ----
            let header = format!(
                "{}  ({}/{})",
                table.year_column,
                state.filters.years.len(),
                years.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("years")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_years();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_years();
                        }
                    });
                    for year in &years {
                        let mut checked = state.filters.years.contains(year);
                        if ui.checkbox(&mut checked, year.to_string()).changed() {
                            state.toggle_year(*year);
                        }
                    }
                });

            // ---- Programs ----
            let header = format!(
                "{}  ({}/{})",
                table.program_column,
                state.filters.programs.len(),
                programs.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("programs")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_programs();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_programs();
                        }
                    });
                    for program in &programs {
                        let mut checked = state.filters.programs.contains(program);
                        let text = RichText::new(program).color(state.colors.color_for(program));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_program(program);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source_path.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                if let Err(e) = state.reload() {
                    log::debug!("Reload failed: {e}");
                }
                ui.close_menu();
            }
            if ui
                .add_enabled(!state.insights.is_empty(), egui::Button::new("Export insights…"))
                .clicked()
            {
                if let Err(e) = export_dialog(state) {
                    log::error!("Export failed: {e:#}");
                    state.status_message = Some(format!("Error: {e:#}"));
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} records loaded, {} visible",
                table.len(),
                state.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open ranking data")
        .add_filter("Delimited text", &["csv", "txt"])
        .pick_file();

    if let Some(path) = file {
        // `open` already logs the error and shows it in the status line.
        if let Err(e) = state.open(&path) {
            log::debug!("Open dialog load failed: {e}");
        }
    }
}

fn export_dialog(state: &AppState) -> Result<()> {
    let file = rfd::FileDialog::new()
        .set_title("Export insights")
        .add_filter("JSON", &["json"])
        .set_file_name("insights.json")
        .save_file();

    if let Some(path) = file {
        export::write_insights(&path, &state.all_insights())?;
    }
    Ok(())
}
