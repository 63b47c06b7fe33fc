use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ProgramColors;
use crate::config::DashboardConfig;
use crate::data::cache;
use crate::data::filter::{filter, rows_for_year, FilterState};
use crate::data::model::{MetricValue, Table};
use crate::data::trend::{analyze_many, TrendRecord};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// File the table was loaded from.
    pub source_path: Option<PathBuf>,

    /// Loaded dataset (None until a file loads).
    pub table: Option<Arc<Table>>,

    /// Year / program selections.
    pub filters: FilterState,

    /// Rows passing the current filters (cached).
    pub filtered: Table,

    /// Per insight metric, one trend per program of `filtered` (cached).
    pub insights: Vec<(String, Vec<TrendRecord>)>,

    /// Metric drawn in the time-series chart.
    pub selected_metric: String,

    /// Year shown in the comparison bar chart.
    pub comparison_year: Option<i32>,

    pub colors: ProgramColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let selected_metric = config
            .chart_metrics
            .first()
            .cloned()
            .unwrap_or_else(|| config.comparison_metric.clone());
        Self {
            filtered: Table::new(
                config.source.year_column.clone(),
                config.source.program_column.clone(),
                Vec::new(),
                Vec::new(),
            ),
            config,
            source_path: None,
            table: None,
            filters: FilterState::default(),
            insights: Vec::new(),
            selected_metric,
            comparison_year: None,
            colors: ProgramColors::default(),
            status_message: None,
        }
    }

    /// Load (or fetch from the cache) `path` and make it the active table.
    /// On failure the previous table stays and the error is shown.
    pub fn open(&mut self, path: &Path) -> Result<(), LoadError> {
        match cache::load_cached(path, &self.config.source) {
            Ok(table) => {
                self.source_path = Some(path.to_path_buf());
                self.set_table(table);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Drop the cached copy of the current source and read it again.
    pub fn reload(&mut self) -> Result<(), LoadError> {
        let Some(path) = self.source_path.clone() else {
            return Ok(());
        };
        cache::invalidate(&path);
        self.open(&path)
    }

    /// Ingest a newly loaded table, select everything and rebuild derived views.
    pub fn set_table(&mut self, table: Arc<Table>) {
        self.filters = FilterState::all(&table);
        self.colors = ProgramColors::new(&table.programs());
        self.comparison_year = table.years().last().copied();
        self.status_message = match table.skipped_rows {
            0 => None,
            n => Some(format!("{n} row(s) without a valid year were skipped")),
        };
        self.table = Some(table);
        self.refilter();
    }

    /// Recompute `filtered` and `insights` after a filter change.
    pub fn refilter(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        self.filtered = filter(table, &self.filters);
        self.insights = analyze_many(&self.filtered, &self.config.insight_metrics);
    }

    pub fn toggle_year(&mut self, year: i32) {
        if !self.filters.years.remove(&year) {
            self.filters.years.insert(year);
        }
        self.refilter();
    }

    pub fn toggle_program(&mut self, program: &str) {
        if !self.filters.programs.remove(program) {
            self.filters.programs.insert(program.to_string());
        }
        self.refilter();
    }

    pub fn select_all_years(&mut self) {
        if let Some(table) = &self.table {
            self.filters.years = table.years();
            self.refilter();
        }
    }

    pub fn select_no_years(&mut self) {
        self.filters.years.clear();
        self.refilter();
    }

    pub fn select_all_programs(&mut self) {
        if let Some(table) = &self.table {
            self.filters.programs = table.programs();
            self.refilter();
        }
    }

    pub fn select_no_programs(&mut self) {
        self.filters.programs.clear();
        self.refilter();
    }

    /// Time series of the selected metric per program, ordered by year.
    /// Missing values are left out of the line.
    pub fn metric_series(&self) -> BTreeMap<String, Vec<[f64; 2]>> {
        let mut series: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
        for r in &self.filtered.records {
            let entry = series.entry(r.program.clone()).or_default();
            if let Some(v) = r.metric(&self.selected_metric) {
                entry.push([f64::from(r.year), v]);
            }
        }
        for points in series.values_mut() {
            points.sort_by(|a, b| a[0].total_cmp(&b[0]));
        }
        series
    }

    /// Comparison-metric value per program for `comparison_year`, taken from
    /// the full table so the chart ignores the sidebar filters.
    pub fn comparison_bars(&self) -> Vec<(String, MetricValue)> {
        let (Some(table), Some(year)) = (&self.table, self.comparison_year) else {
            return Vec::new();
        };
        rows_for_year(table, year)
            .into_iter()
            .map(|r| (r.program.clone(), r.metric(&self.config.comparison_metric)))
            .collect()
    }

    /// All insight records, flattened in display order.
    pub fn all_insights(&self) -> Vec<TrendRecord> {
        self.insights
            .iter()
            .flat_map(|(_, trends)| trends.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceOptions;
    use crate::data::trend::TrendDirection;
    use std::io::Write;

    const CSV: &str = "Ano;Curso;Posição;Nota em avaliação do Mercado\n\
        2018;Elétrica;10;4\n\
        2021;Elétrica;5;6\n\
        2018;Civil;3;2\n\
        2019;Civil;3;n/d\n\
        2021;Química;8;1\n";

    fn config() -> DashboardConfig {
        DashboardConfig {
            source: SourceOptions {
                required_columns: vec!["Posição".to_string()],
                ..SourceOptions::default()
            },
            insight_metrics: vec![
                "Posição".to_string(),
                "Nota em avaliação do Mercado".to_string(),
            ],
            ..DashboardConfig::default()
        }
    }

    fn loaded() -> (AppState, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let mut state = AppState::new(config());
        state.open(file.path()).unwrap();
        (state, file)
    }

    #[test]
    fn open_selects_everything_and_builds_insights() {
        let (state, _file) = loaded();
        assert_eq!(state.filtered.len(), 5);
        assert_eq!(state.comparison_year, Some(2021));
        assert_eq!(state.insights.len(), 2);

        let positions = &state.insights[0].1;
        let directions: Vec<(&str, TrendDirection)> = positions
            .iter()
            .map(|t| (t.program.as_str(), t.direction))
            .collect();
        assert_eq!(
            directions,
            vec![
                ("Civil", TrendDirection::Stable),
                ("Elétrica", TrendDirection::Improved),
                ("Química", TrendDirection::InsufficientData),
            ]
        );

        let market = &state.insights[1].1;
        assert_eq!(market[0].direction, TrendDirection::InsufficientData);
        assert_eq!(market[1].direction, TrendDirection::Worsened);
    }

    #[test]
    fn year_filter_changes_trends() {
        let (mut state, _file) = loaded();
        state.toggle_year(2021);
        assert_eq!(state.filtered.len(), 3);

        let eletrica = state.insights[0]
            .1
            .iter()
            .find(|t| t.program == "Elétrica")
            .unwrap();
        assert_eq!(eletrica.direction, TrendDirection::InsufficientData);

        state.toggle_year(2021);
        assert_eq!(state.filtered.len(), 5);
    }

    #[test]
    fn none_then_all_programs() {
        let (mut state, _file) = loaded();
        state.select_no_programs();
        assert!(state.filtered.is_empty());
        assert!(state.insights[0].1.is_empty());

        state.select_all_programs();
        assert_eq!(state.filtered.len(), 5);
    }

    #[test]
    fn series_skip_missing_values() {
        let (mut state, _file) = loaded();
        state.selected_metric = "Nota em avaliação do Mercado".to_string();
        let series = state.metric_series();
        assert_eq!(series["Civil"], vec![[2018.0, 2.0]]);
        assert_eq!(series["Elétrica"], vec![[2018.0, 4.0], [2021.0, 6.0]]);
    }

    #[test]
    fn comparison_ignores_filters() {
        let (mut state, _file) = loaded();
        state.select_no_programs();
        let bars = state.comparison_bars();
        assert_eq!(
            bars,
            vec![
                ("Elétrica".to_string(), Some(5.0)),
                ("Química".to_string(), Some(8.0)),
            ]
        );
    }

    #[test]
    fn failed_open_keeps_previous_table() {
        let (mut state, _file) = loaded();
        let dir = tempfile::tempdir().unwrap();
        assert!(state.open(&dir.path().join("missing.csv")).is_err());
        assert!(state.status_message.is_some());
        assert_eq!(state.filtered.len(), 5);
    }

    #[test]
    fn reload_reads_changed_source() {
        let (mut state, file) = loaded();
        std::fs::write(file.path(), "Ano;Curso;Posição\n2018;Civil;3\n").unwrap();
        state.reload().unwrap();
        assert_eq!(state.filtered.len(), 1);
        assert_eq!(state.all_insights().len(), 2);
    }
}
