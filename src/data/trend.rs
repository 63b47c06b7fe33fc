use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::model::{MetricValue, Record, Table};

// ---------------------------------------------------------------------------
// Trend direction
// ---------------------------------------------------------------------------

/// Change of a metric between a program's first and last recorded year.
/// All metrics are read as rank-like: lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improved,
    Worsened,
    Stable,
    /// Fewer than two years, or a missing first/last value.
    InsufficientData,
}

impl TrendDirection {
    /// Lower-is-better comparison. Exact equality means stable.
    pub fn classify(first: MetricValue, last: MetricValue) -> Self {
        match (first, last) {
            (Some(first), Some(last)) if last < first => TrendDirection::Improved,
            (Some(first), Some(last)) if last > first => TrendDirection::Worsened,
            (Some(first), Some(last)) if last == first => TrendDirection::Stable,
            _ => TrendDirection::InsufficientData,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrendDirection::Improved => "⬆ Improved",
            TrendDirection::Worsened => "⬇ Worsened",
            TrendDirection::Stable => "➡ Stable",
            TrendDirection::InsufficientData => "Insufficient data",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Trend record
// ---------------------------------------------------------------------------

/// Trend of one metric for one program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRecord {
    pub program: String,
    pub metric_name: String,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub first_value: MetricValue,
    pub last_value: MetricValue,
    /// Rows the program has in the analysed table.
    pub observations: usize,
    pub direction: TrendDirection,
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Group rows by program, order each group by year, and compare the
/// earliest row with the latest one.
///
/// Output is one record per distinct program, sorted by program name.
/// A group with a single row is reported as
/// [`TrendDirection::InsufficientData`] instead of being compared with itself.
/// When several rows share the earliest (or latest) year, the one appearing
/// first (or last) in the table wins.
pub fn analyze(table: &Table, metric: &str) -> Vec<TrendRecord> {
    if !table.is_empty() && !table.has_column(metric) {
        log::warn!("Metric '{metric}' is not a column of the table");
    }

    let mut groups: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
    for record in &table.records {
        groups.entry(record.program.as_str()).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(program, mut rows)| {
            // Stable sort keeps source order within a year.
            rows.sort_by_key(|r| r.year);
            trend_for_group(program, metric, &rows)
        })
        .collect()
}

/// Run [`analyze`] once per metric, in the given order.
pub fn analyze_many<S: AsRef<str>>(
    table: &Table,
    metrics: &[S],
) -> Vec<(String, Vec<TrendRecord>)> {
    metrics
        .iter()
        .map(|m| (m.as_ref().to_string(), analyze(table, m.as_ref())))
        .collect()
}

fn trend_for_group(program: &str, metric: &str, rows: &[&Record]) -> TrendRecord {
    let first = rows.first();
    let last = rows.last();
    let first_value = first.and_then(|r| r.metric(metric));
    let last_value = last.and_then(|r| r.metric(metric));

    let direction = if rows.len() < 2 {
        TrendDirection::InsufficientData
    } else {
        TrendDirection::classify(first_value, last_value)
    };

    TrendRecord {
        program: program.to_string(),
        metric_name: metric.to_string(),
        first_year: first.map(|r| r.year),
        last_year: last.map(|r| r.year),
        first_value,
        last_value,
        observations: rows.len(),
        direction,
    }
}
