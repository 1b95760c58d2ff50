//! Rectangular named-column table.
//!
//! Rows are always exactly as wide as the header. Looking up a column that
//! is not present yields [`Cell::Null`] for every row, which is how the
//! display projection tolerates upstream column renames.

use serde::Serialize;

use crate::cell::{parse_number, Cell};
use crate::error::EngineError;

static NULL: Cell = Cell::Null;

/// Field values a spreadsheet export uses for "no value".
///
/// Matches the sentinel set common dataframe CSV readers treat as missing.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing_marker(field: &str) -> bool {
    MISSING_MARKERS.contains(&field)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Build a table from already-typed rows. Every row must match the header width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, EngineError> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Rows the caller has already built to the header width.
    pub(crate) fn from_fixed_width(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    /// Build a table from raw text fields, inferring a type per column.
    ///
    /// Missing markers become `Null`. A column whose remaining values all
    /// parse as finite numbers becomes numeric; otherwise its values stay text.
    /// Short rows are padded with nulls and long rows truncated.
    pub fn from_text_rows(columns: Vec<String>, raw: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let numeric: Vec<bool> = (0..width)
            .map(|c| {
                let mut saw_value = false;
                let all_numeric = raw.iter().all(|row| match row.get(c) {
                    Some(f) if !is_missing_marker(f) => {
                        saw_value = true;
                        parse_number(f).is_some()
                    }
                    _ => true,
                });
                saw_value && all_numeric
            })
            .collect();

        let rows = raw
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row.into_iter()
                    .enumerate()
                    .map(|(c, field)| {
                        if is_missing_marker(&field) {
                            Cell::Null
                        } else if numeric[c] {
                            parse_number(&field).map(Cell::Number).unwrap_or(Cell::Null)
                        } else {
                            Cell::Text(field)
                        }
                    })
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), EngineError> {
        if row.len() != self.columns.len() {
            return Err(EngineError::RaggedRow {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row` in column `name`; `Null` when the column does not exist.
    pub fn get(&self, row: usize, name: &str) -> &Cell {
        match self.column_index(name) {
            Some(c) => self.cell(row, c),
            None => &NULL,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows.get(row).and_then(|r| r.get(col)).unwrap_or(&NULL)
    }

    /// Iterate a column's cells. Yields `Null` per row for an absent column.
    pub fn column<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Cell> + 'a {
        let idx = self.column_index(name);
        self.rows.iter().map(move |row| match idx {
            Some(c) => &row[c],
            None => &NULL,
        })
    }

    /// Append an all-null column if `name` is absent.
    pub fn ensure_column(&mut self, name: &str) {
        if self.has_column(name) {
            return;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(Cell::Null);
        }
    }

    /// Keep rows for which `keep` returns true, preserving order.
    pub fn filter_rows(&self, mut keep: impl FnMut(usize) -> bool) -> Table {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, _)| keep(*i))
            .map(|(_, r)| r.clone())
            .collect();
        Table { columns: self.columns.clone(), rows }
    }

    /// Project onto `names` in order; absent columns come out all-null.
    pub fn select(&self, names: &[&str]) -> Table {
        let idx: Vec<Option<usize>> = names.iter().map(|n| self.column_index(n)).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                idx.iter()
                    .map(|i| i.map(|c| row[c].clone()).unwrap_or(Cell::Null))
                    .collect()
            })
            .collect();
        Table {
            columns: names.iter().map(|s| s.to_string()).collect(),
            rows,
        }
    }
}
