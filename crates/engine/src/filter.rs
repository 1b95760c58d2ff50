//! Case filters - exact-match selectors over case type and status.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::columns::{CASE_STATUS, CASE_TYPE};
use crate::table::Table;

/// Label for the "no filter" choice
pub const ALL: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Exact(String),
}

impl Selection {
    pub fn exact(v: impl Into<String>) -> Self {
        Selection::Exact(v.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// `All` matches everything, including null. `Exact` never matches null.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Exact(want) => value == Some(want.as_str()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Selection::All => ALL,
            Selection::Exact(v) => v,
        }
    }
}

impl FromStr for Selection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL { Selection::All } else { Selection::Exact(s.to_string()) })
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Selection {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CaseFilter {
    pub case_type: Selection,
    pub case_status: Selection,
}

impl CaseFilter {
    pub fn new(case_type: Selection, case_status: Selection) -> Self {
        Self { case_type, case_status }
    }

    pub fn is_active(&self) -> bool {
        !self.case_type.is_all() || !self.case_status.is_all()
    }

    /// Rows of `cases` passing both selections, in table order.
    pub fn apply(&self, cases: &Table) -> Table {
        if !self.is_active() {
            return cases.clone();
        }
        cases.filter_rows(|row| {
            let ty = cases.get(row, CASE_TYPE).as_string();
            let status = cases.get(row, CASE_STATUS).as_string();
            self.case_type.matches(ty.as_deref()) && self.case_status.matches(status.as_deref())
        })
    }
}

/// Choices for a selector: `"All"` then the distinct non-null values, sorted.
pub fn filter_options(table: &Table, column: &str) -> Vec<String> {
    let distinct: BTreeSet<String> = table.column(column).filter_map(|c| c.as_string()).collect();
    std::iter::once(ALL.to_string()).chain(distinct).collect()
}
