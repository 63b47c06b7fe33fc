use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "RANKING_DASHBOARD_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

pub const COL_OVERALL: &str = "Posição";
pub const COL_COMPLETERS_POSITION: &str = "Posição Nota dos concluintes";

/// Score columns of the reference dataset, besides the two position columns.
pub const SCORE_COLUMNS: [&str; 7] = [
    "Nota em avaliação do Mercado",
    "Nota em qualidade de ensino",
    "Nota em Professores com doutorado e mestrado",
    "Nota dos concluintes",
    "Nota em Tempo de Dedicação dos Professores",
    "Nota em Permanência dos alunos",
    "Nota em avaliação dos docentes",
];

// ---------------------------------------------------------------------------
// Source options: everything the loader needs
// ---------------------------------------------------------------------------

/// How to read and normalise the delimited source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceOptions {
    /// Field delimiter; a single ASCII character.
    pub delimiter: char,
    pub year_column: String,
    pub program_column: String,
    /// Columns whose cells may hold range buckets such as `201-250`.
    pub bucket_columns: Vec<String>,
    /// Metric columns that must be present in the header row.
    pub required_columns: Vec<String>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        let mut required_columns = vec![
            COL_OVERALL.to_string(),
            COL_COMPLETERS_POSITION.to_string(),
        ];
        required_columns.extend(SCORE_COLUMNS.iter().map(|c| c.to_string()));

        Self {
            delimiter: ';',
            year_column: "Ano".to_string(),
            program_column: "Curso".to_string(),
            bucket_columns: vec![COL_COMPLETERS_POSITION.to_string()],
            required_columns,
        }
    }
}

impl SourceOptions {
    /// The delimiter as the byte the `csv` reader expects.
    /// Non-ASCII delimiters fall back to `;`.
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            log::warn!(
                "Delimiter {:?} is not ASCII, using ';' instead",
                self.delimiter
            );
            b';'
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// File loaded at start-up.
    pub data_path: PathBuf,
    pub source: SourceOptions,
    /// Metrics offered in the time-series selector.
    pub chart_metrics: Vec<String>,
    /// Metrics that get an automatic insight block, in display order.
    pub insight_metrics: Vec<String>,
    /// Metric drawn in the single-year comparison bar chart.
    pub comparison_metric: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let mut chart_metrics = vec![COL_OVERALL.to_string()];
        chart_metrics.extend(SCORE_COLUMNS.iter().map(|c| c.to_string()));

        Self {
            data_path: PathBuf::from("data/cursos.csv"),
            source: SourceOptions::default(),
            chart_metrics,
            insight_metrics: vec![
                COL_OVERALL.to_string(),
                "Nota em avaliação do Mercado".to_string(),
                "Nota em qualidade de ensino".to_string(),
            ],
            comparison_metric: COL_OVERALL.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load the config from `$RANKING_DASHBOARD_CONFIG`, else `dashboard.json`.
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DashboardConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_describe_reference_dataset() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.source.delimiter, ';');
        assert_eq!(cfg.source.year_column, "Ano");
        assert_eq!(cfg.source.program_column, "Curso");
        assert_eq!(cfg.source.required_columns.len(), 9);
        assert_eq!(cfg.insight_metrics.len(), 3);
        assert_eq!(cfg.source.delimiter_byte(), b';');
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DashboardConfig::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(cfg, DashboardConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "source": {{ "delimiter": "," }}, "insight_metrics": ["Posição"] }}"#
        )
        .unwrap();

        let cfg = DashboardConfig::load_from(file.path()).unwrap();
        assert_eq!(cfg.source.delimiter, ',');
        assert_eq!(cfg.source.year_column, "Ano");
        assert_eq!(cfg.insight_metrics, vec!["Posição".to_string()]);
        assert_eq!(cfg.comparison_metric, COL_OVERALL);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            DashboardConfig::load_from(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn non_ascii_delimiter_falls_back() {
        let opts = SourceOptions {
            delimiter: 'ç',
            ..SourceOptions::default()
        };
        assert_eq!(opts.delimiter_byte(), b';');
    }

    #[test]
    fn default_metrics_exist_in_shipped_data() {
        let cfg = DashboardConfig::default();
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(&cfg.data_path);
        let table = crate::data::loader::load(&path, &cfg.source).unwrap();

        let configured = cfg
            .insight_metrics
            .iter()
            .chain(&cfg.chart_metrics)
            .chain(std::iter::once(&cfg.comparison_metric));
        for metric in configured {
            assert!(table.has_column(metric), "'{metric}' is not a column");
        }
    }
}
