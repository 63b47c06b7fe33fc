use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::config::SourceOptions;
use crate::error::LoadError;

use super::model::{MetricValue, Record, Table};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a ranking table from a delimited text file.
///
/// The whole file is read up front so an unreadable source is always reported
/// as [`LoadError::DataUnavailable`] rather than as a mid-parse CSV error.
/// Prefer [`super::cache::load_cached`] from UI code.
pub fn load(path: &Path, options: &SourceOptions) -> Result<Table, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::DataUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let table = load_reader(bytes.as_slice(), options)?;
    log::info!(
        "Loaded {} rows ({} programs, {} years) from {}",
        table.len(),
        table.programs().len(),
        table.years().len(),
        path.display()
    );
    Ok(table)
}

/// Parse a ranking table from any reader. The first row must be the header.
///
/// Layout:
/// * `options.year_column` – integer report year
/// * `options.program_column` – program name
/// * every other column – a numeric metric; unreadable cells become missing
pub fn load_reader<R: Read>(reader: R, options: &SourceOptions) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter_byte())
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            // Spreadsheet exports often start with a byte-order mark.
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();

    let position = |name: &str| headers.iter().position(|h| h == name);

    let missing: Vec<String> = [&options.year_column, &options.program_column]
        .into_iter()
        .chain(options.required_columns.iter())
        .filter(|col| position(col.as_str()).is_none())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::SchemaMismatch { missing });
    }

    // Both present, checked above.
    let year_idx = position(&options.year_column).unwrap_or_default();
    let program_idx = position(&options.program_column).unwrap_or_default();

    let metric_cols: Vec<(usize, &String, bool)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != year_idx && *i != program_idx)
        .map(|(i, name)| (i, name, options.bucket_columns.contains(name)))
        .collect();

    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for (row_no, result) in reader.records().enumerate() {
        let row = result?;

        let year_cell = row.get(year_idx).unwrap_or("").trim();
        let Ok(year) = year_cell.parse::<i32>() else {
            log::warn!("Row {row_no}: year '{year_cell}' is not an integer, skipping row");
            skipped_rows += 1;
            continue;
        };
        let program = row.get(program_idx).unwrap_or("").trim().to_string();

        let mut metrics = BTreeMap::new();
        for &(col_idx, name, is_bucket) in &metric_cols {
            let cell = row.get(col_idx).unwrap_or("");
            let value = if is_bucket {
                normalize_bucket(cell)
            } else {
                parse_metric(cell)
            };
            if value.is_none() && !cell.trim().is_empty() {
                log::debug!("Row {row_no}, {name}: '{cell}' is not numeric, treating as missing");
            }
            metrics.insert(name.clone(), value);
        }

        records.push(Record {
            year,
            program,
            metrics,
        });
    }

    let columns = metric_cols.iter().map(|(_, name, _)| (*name).clone()).collect();
    let mut table = Table::new(
        options.year_column.clone(),
        options.program_column.clone(),
        columns,
        records,
    );
    table.skipped_rows = skipped_rows;
    Ok(table)
}

// ---------------------------------------------------------------------------
// Cell normalisation
// ---------------------------------------------------------------------------

/// Parse a plain numeric cell. Empty, non-numeric and non-finite cells are
/// missing.
pub fn parse_metric(cell: &str) -> MetricValue {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a cell that may hold a rank bucket such as `201-250`.
///
/// Plain numbers pass through unchanged; a bucket `<a>-<b>` becomes its
/// integer midpoint `(a + b) / 2`, so `201-250` maps to `225`.
pub fn normalize_bucket(cell: &str) -> MetricValue {
    parse_metric(cell).or_else(|| bucket_midpoint(cell.trim()))
}

fn bucket_midpoint(cell: &str) -> MetricValue {
    let (lo, hi) = cell.split_once('-')?;
    let (lo, hi) = (lo.trim(), hi.trim());
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(lo) || !is_digits(hi) {
        return None;
    }
    let lo: u64 = lo.parse().ok()?;
    let hi: u64 = hi.parse().ok()?;
    Some((lo.checked_add(hi)? / 2) as f64)
}
