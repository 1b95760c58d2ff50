use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::columns::{CASE_STATUS, CASE_TYPE, NAME, STATUS_OPEN, STATUS_UNDER_INVESTIGATION};
use crate::table::Table;

/// The four dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub total_cases: usize,
    pub open: usize,
    pub under_investigation: usize,
    pub unique_clients: usize,
}

/// Counters over the filtered cases. `unique_clients` counts distinct names
/// across the whole personal table and ignores the filter.
pub fn compute_metrics(filtered_cases: &Table, people: &Table) -> Metrics {
    let status_count = |want: &str| {
        filtered_cases
            .column(CASE_STATUS)
            .filter(|c| c.as_string().as_deref() == Some(want))
            .count()
    };

    let unique_clients = people
        .column(NAME)
        .filter_map(|c| c.as_string())
        .collect::<HashSet<_>>()
        .len();

    Metrics {
        total_cases: filtered_cases.len(),
        open: status_count(STATUS_OPEN),
        under_investigation: status_count(STATUS_UNDER_INVESTIGATION),
        unique_clients,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub count: usize,
    /// Share of the non-null total, 0..=100
    pub percent: f64,
}

/// Distinct non-null values with counts: highest count first, ties in
/// first-appearance order.
pub fn value_counts(table: &Table, column: &str) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in table.column(column).filter_map(|c| c.as_string()) {
        let n = counts.entry(value.clone()).or_insert(0);
        if *n == 0 {
            order.push(value);
        }
        *n += 1;
    }

    let mut out: Vec<(String, usize)> = order
        .into_iter()
        .map(|v| {
            let n = counts[&v];
            (v, n)
        })
        .collect();
    // stable sort keeps first-appearance order among equal counts
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Proportion breakdown (the "Cases by Type" chart).
pub fn proportions(table: &Table, column: &str) -> Vec<Slice> {
    let counts = value_counts(table, column);
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    counts
        .into_iter()
        .map(|(label, count)| Slice {
            label,
            count,
            percent: if total == 0 { 0.0 } else { count as f64 * 100.0 / total as f64 },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub label: String,
    pub count: usize,
}

/// Count breakdown (the "Cases by Status" chart).
pub fn counts(table: &Table, column: &str) -> Vec<Bar> {
    value_counts(table, column)
        .into_iter()
        .map(|(label, count)| Bar { label, count })
        .collect()
}

/// Chart data for one render cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Breakdown {
    pub by_type: Vec<Slice>,
    pub by_status: Vec<Bar>,
}

pub fn compute_breakdown(filtered_cases: &Table) -> Breakdown {
    Breakdown {
        by_type: proportions(filtered_cases, CASE_TYPE),
        by_status: counts(filtered_cases, CASE_STATUS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    fn cases(statuses: &[Option<&str>]) -> Table {
        Table::from_rows(
            vec![CASE_STATUS.to_string()],
            statuses.iter().map(|s| vec![s.map(Cell::text).unwrap_or(Cell::Null)]).collect(),
        )
        .unwrap()
    }

    fn names(v: &[Option<&str>]) -> Table {
        Table::from_rows(
            vec![NAME.to_string()],
            v.iter().map(|s| vec![s.map(Cell::text).unwrap_or(Cell::Null)]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn metrics_count_statuses() {
        let c = cases(&[Some("Open"), Some("Under Investigation"), Some("Open"), Some("Closed"), None]);
        let m = compute_metrics(&c, &names(&[Some("Jo"), Some("Sam"), Some("Jo"), None]));
        assert_eq!(
            m,
            Metrics { total_cases: 5, open: 2, under_investigation: 1, unique_clients: 2 }
        );
    }

    #[test]
    fn metrics_on_empty_tables() {
        let m = compute_metrics(&cases(&[]), &names(&[]));
        assert_eq!(m, Metrics::default());
    }

    #[test]
    fn value_counts_order() {
        let c = cases(&[Some("Closed"), Some("Open"), Some("Open"), Some("Pending"), Some("Closed"), None]);
        assert_eq!(
            value_counts(&c, CASE_STATUS),
            vec![("Closed".to_string(), 2), ("Open".to_string(), 2), ("Pending".to_string(), 1)]
        );
    }

    #[test]
    fn proportions_sum_to_100() {
        let c = cases(&[Some("A"), Some("B"), Some("B")]);
        let slices = proportions(&c, CASE_STATUS);
        let total: f64 = slices.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(slices[0].label, "B");
        assert!((slices[0].percent - 66.666_666).abs() < 1e-3);
    }

    #[test]
    fn proportions_empty() {
        assert!(proportions(&cases(&[]), CASE_STATUS).is_empty());
    }
}
