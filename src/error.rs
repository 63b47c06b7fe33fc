use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures while turning a source file into a [`Table`](crate::data::model::Table).
///
/// Unparseable metric cells are not represented here: they become missing
/// values inside the table.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("data unavailable: {path}: {source}")]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schema mismatch: missing column(s) {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
