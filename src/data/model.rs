use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// MetricValue – a single numeric cell
// ---------------------------------------------------------------------------

/// A normalised metric cell. `None` means the source value was empty or
/// could not be read as a number.
pub type MetricValue = Option<f64>;

/// Render a metric for labels and the raw table.
pub fn format_metric(value: MetricValue) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// One program's results for one report year.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub year: i32,
    pub program: String,
    /// Metric column name → normalised value.
    pub metrics: BTreeMap<String, MetricValue>,
}

impl Record {
    /// Value of `metric`, or `None` when the column is absent or the cell missing.
    pub fn metric(&self, metric: &str) -> MetricValue {
        self.metrics.get(metric).copied().flatten()
    }
}

// ---------------------------------------------------------------------------
// Table – an immutable set of records
// ---------------------------------------------------------------------------

/// A loaded (or filtered) dataset. Never mutated after construction:
/// filtering produces a new `Table`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Header name of the year column, kept for display.
    pub year_column: String,
    /// Header name of the program column, kept for display.
    pub program_column: String,
    /// Metric columns in source header order.
    pub columns: Vec<String>,
    /// Rows in source order.
    pub records: Vec<Record>,
    /// Source rows dropped because their year was unreadable.
    pub skipped_rows: usize,
}

/// Headline numbers of a (filtered) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub programs: usize,
    pub years: usize,
    pub rows: usize,
}

impl Table {
    pub fn new(
        year_column: impl Into<String>,
        program_column: impl Into<String>,
        columns: Vec<String>,
        records: Vec<Record>,
    ) -> Self {
        Table {
            year_column: year_column.into(),
            program_column: program_column.into(),
            columns,
            records,
            skipped_rows: 0,
        }
    }

    /// A table with the same columns holding only `records`.
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        Table {
            year_column: self.year_column.clone(),
            program_column: self.program_column.clone(),
            columns: self.columns.clone(),
            records,
            skipped_rows: self.skipped_rows,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, metric: &str) -> bool {
        self.columns.iter().any(|c| c == metric)
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    /// Distinct program names, sorted.
    pub fn programs(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.program.clone()).collect()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            programs: self.programs().len(),
            years: self.years().len(),
            rows: self.len(),
        }
    }
}
