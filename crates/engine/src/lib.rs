//! `caseboard-engine`: case/person join and dashboard computations.
//!
//! Pure engine crate: receives pre-loaded tables, returns merged rows,
//! counters and chart data. No IO.

pub mod case_list;
pub mod cell;
pub mod columns;
pub mod dashboard;
pub mod error;
pub mod expand;
pub mod filter;
pub mod join;
pub mod summary;
pub mod table;

pub use case_list::{classify_case_list, decode_case_list, parse_case_list, CaseListError, CaseListField};
pub use cell::Cell;
pub use dashboard::{FilteredView, Snapshot, Sources};
pub use error::EngineError;
pub use expand::{expand_people, Expansion, ExpansionStats, PersonCaseLink};
pub use filter::{filter_options, CaseFilter, Selection};
pub use join::{join_cases, join_expanded, FanOut, JoinDiagnostics, JoinOutput, MergedRow, MergedTable};
pub use summary::{compute_breakdown, compute_metrics, value_counts, Bar, Breakdown, Metrics, Slice};
pub use table::Table;
