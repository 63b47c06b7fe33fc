use std::collections::BTreeSet;

use super::model::{Record, Table};

// ---------------------------------------------------------------------------
// Filter predicate: which years and programs are selected
// ---------------------------------------------------------------------------

/// Year / program selection. A row passes when both its year and its program
/// are selected; an empty set therefore hides everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub years: BTreeSet<i32>,
    pub programs: BTreeSet<String>,
}

impl FilterState {
    /// Everything in `table` selected (i.e., show everything).
    pub fn all(table: &Table) -> Self {
        FilterState {
            years: table.years(),
            programs: table.programs(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.years.contains(&record.year) && self.programs.contains(&record.program)
    }
}

/// Return a new table holding the rows of `table` that pass `filters`,
/// in their original order.
pub fn filter(table: &Table, filters: &FilterState) -> Table {
    let records = table
        .records
        .iter()
        .filter(|r| filters.matches(r))
        .cloned()
        .collect();
    table.with_records(records)
}

/// Rows of a single year, ordered by program for the comparison chart.
pub fn rows_for_year(table: &Table, year: i32) -> Vec<&Record> {
    let mut rows: Vec<&Record> = table.records.iter().filter(|r| r.year == year).collect();
    rows.sort_by(|a, b| a.program.cmp(&b.program));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{record, table};

    fn sample() -> Table {
        table(vec![
            record(2018, "Civil", &[("Posição", Some(3.0))]),
            record(2019, "Elétrica", &[("Posição", Some(1.0))]),
            record(2019, "Civil", &[("Posição", Some(2.0))]),
            record(2020, "Mecânica", &[("Posição", None)]),
        ])
    }

    #[test]
    fn selecting_everything_is_identity() {
        let t = sample();
        assert_eq!(filter(&t, &FilterState::all(&t)), t);
    }

    #[test]
    fn filter_keeps_order_and_intersects_selections() {
        let t = sample();
        let state = FilterState {
            years: [2019, 2020].into_iter().collect(),
            programs: ["Civil", "Mecânica"].iter().map(|s| s.to_string()).collect(),
        };
        let out = filter(&t, &state);
        let rows: Vec<(i32, &str)> = out
            .records
            .iter()
            .map(|r| (r.year, r.program.as_str()))
            .collect();
        assert_eq!(rows, vec![(2019, "Civil"), (2020, "Mecânica")]);
        assert_eq!(out.columns, t.columns);
        // Source untouched.
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn empty_selection_hides_everything() {
        let t = sample();
        let state = FilterState {
            years: BTreeSet::new(),
            ..FilterState::all(&t)
        };
        assert!(filter(&t, &state).is_empty());
    }

    #[test]
    fn year_rows_sorted_by_program() {
        let t = sample();
        let programs: Vec<&str> = rows_for_year(&t, 2019)
            .iter()
            .map(|r| r.program.as_str())
            .collect();
        assert_eq!(programs, vec!["Civil", "Elétrica"]);
        assert!(rows_for_year(&t, 1999).is_empty());
    }
}
