use caseboard_engine::columns::DISPLAY_COLUMNS;
use caseboard_engine::MergedTable;

use crate::util;

/// The merged table, pre-rendered for drawing.
pub struct MergedGrid {
    /// Row-major display strings (null = "")
    pub rows: Vec<Vec<String>>,
    pub col_names: Vec<String>,
    /// Display widths, clamped to [3, 40]
    pub col_widths: Vec<usize>,
    /// Rows with no matching person
    pub unmatched: usize,
}

impl MergedGrid {
    pub fn from_merged(merged: &MergedTable) -> Self {
        let rows: Vec<Vec<String>> = merged
            .rows
            .iter()
            .map(|r| r.display_cells().iter().map(|c| c.display()).collect())
            .collect();
        let col_names: Vec<String> = DISPLAY_COLUMNS.iter().map(|s| s.to_string()).collect();
        let col_widths = util::column_widths(&col_names, &rows);
        let unmatched = merged.rows.iter().filter(|r| !r.is_matched()).count();
        Self { rows, col_names, col_widths, unmatched }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Columns that fit in `available` display columns, starting at the first.
    pub fn visible_columns(&self, available: usize) -> usize {
        let mut used = 0usize;
        let mut count = 0;
        for &w in &self.col_widths {
            if used + w + 1 > available && count > 0 {
                break;
            }
            used += w + 1;
            count += 1;
        }
        count
    }
}
