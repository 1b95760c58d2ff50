use serde::Serialize;

use crate::columns::{CASE_STATUS, CASE_TYPE};
use crate::filter::{filter_options, CaseFilter};
use crate::join::{join_cases, JoinDiagnostics, MergedTable};
use crate::summary::{compute_breakdown, compute_metrics, Breakdown, Metrics};
use crate::table::Table;

/// Source tables for one render cycle. Never mutated after loading.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub cases: Table,
    pub people: Table,
}

/// Join output for a pair of source tables. Independent of any filter.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub sources: Sources,
    pub merged: MergedTable,
    pub diagnostics: JoinDiagnostics,
    pub type_options: Vec<String>,
    pub status_options: Vec<String>,
}

impl Snapshot {
    pub fn build(sources: Sources) -> Self {
        let joined = join_cases(&sources.cases, &sources.people);
        let type_options = filter_options(&sources.cases, CASE_TYPE);
        let status_options = filter_options(&sources.cases, CASE_STATUS);
        Self {
            sources,
            merged: joined.merged,
            diagnostics: joined.diagnostics,
            type_options,
            status_options,
        }
    }

    /// Counters and chart data for `filter`. The merged table stays unfiltered.
    pub fn view(&self, filter: &CaseFilter) -> FilteredView {
        let filtered = filter.apply(&self.sources.cases);
        FilteredView {
            filter: filter.clone(),
            metrics: compute_metrics(&filtered, &self.sources.people),
            breakdown: compute_breakdown(&filtered),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredView {
    pub filter: CaseFilter,
    pub metrics: Metrics,
    pub breakdown: Breakdown,
}
