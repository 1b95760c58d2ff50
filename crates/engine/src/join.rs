use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::cell::Cell;
use crate::columns::{
    ADDRESS, CASES_ID, CASE_LABELS, CASE_STATUS, CASE_TITLE, CASE_TYPE, DISPLAY_COLUMNS, NAME,
    PHONE_NUMBER, UNKNOWN_NAME,
};
use crate::expand::{expand_people, Expansion, ExpansionStats};
use crate::table::Table;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One case, decorated with the personal info of one matching person (if any).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRow {
    #[serde(skip)]
    pub case_row: usize,
    #[serde(skip)]
    pub person_row: Option<usize>,
    #[serde(skip)]
    pub case_id: Cell,

    #[serde(rename = "Name")]
    pub name: Cell,
    #[serde(rename = "Phone Number")]
    pub phone_number: Cell,
    #[serde(rename = "Address")]
    pub address: Cell,
    #[serde(rename = "Case Title")]
    pub case_title: Cell,
    #[serde(rename = "Case Type")]
    pub case_type: Cell,
    #[serde(rename = "Case Status")]
    pub case_status: Cell,
    #[serde(rename = "Case Labels")]
    pub case_labels: Cell,
}

impl MergedRow {
    pub fn is_matched(&self) -> bool {
        self.person_row.is_some()
    }

    /// Cells in `DISPLAY_COLUMNS` order.
    pub fn display_cells(&self) -> [&Cell; 7] {
        [
            &self.name,
            &self.phone_number,
            &self.address,
            &self.case_title,
            &self.case_type,
            &self.case_status,
            &self.case_labels,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MergedTable {
    pub rows: Vec<MergedRow>,
}

impl MergedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Project onto the seven display columns.
    pub fn display_table(&self) -> Table {
        Table::from_fixed_width(
            DISPLAY_COLUMNS.iter().map(|c| c.to_string()).collect(),
            self.rows
                .iter()
                .map(|row| row.display_cells().into_iter().cloned().collect())
                .collect(),
        )
    }
}

/// A case id matched by more than one person link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FanOut {
    pub case_id: String,
    /// Links to this id, one merged row each
    pub matches: usize,
    /// Distinct people behind those links
    pub people: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JoinDiagnostics {
    pub case_rows: usize,
    pub merged_rows: usize,
    pub matched_cases: usize,
    pub unmatched_cases: usize,
    pub fanned_out_cases: Vec<FanOut>,
    /// `merged_rows - case_rows`
    pub extra_rows: usize,
    /// Ids listed by people that no case carries (sorted)
    pub orphan_case_ids: Vec<String>,
    pub expansion: ExpansionStats,
}

#[derive(Debug, Clone, Default)]
pub struct JoinOutput {
    pub merged: MergedTable,
    pub diagnostics: JoinDiagnostics,
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

/// Expand `people` and left-join it onto `cases`.
pub fn join_cases(cases: &Table, people: &Table) -> JoinOutput {
    let expansion = expand_people(people);
    join_expanded(cases, people, &expansion)
}

/// Left join from `cases` onto pre-expanded person links.
///
/// Every case appears at least once, in table order. A case matched by N
/// links appears N times, in link order. Rows with a null `Name` (including
/// every unmatched row) get `"Unknown"`.
pub fn join_expanded(cases: &Table, people: &Table, expansion: &Expansion) -> JoinOutput {
    let mut by_case_id: HashMap<&str, Vec<usize>> = HashMap::new();
    for link in &expansion.links {
        if let Some(id) = link.case_id.as_deref() {
            by_case_id.entry(id).or_default().push(link.person_row);
        }
    }

    let mut rows = Vec::with_capacity(cases.len());
    let mut matched_cases = 0;
    let mut fanned_out_cases = Vec::new();
    let mut seen_fan_out: HashSet<String> = HashSet::new();
    let mut case_keys: HashSet<String> = HashSet::new();

    for case_row in 0..cases.len() {
        // cases-side ids are matched as written; only link ids are trimmed
        let key = cases.get(case_row, CASES_ID).as_string();
        let matches = key.as_deref().and_then(|k| by_case_id.get(k));

        match matches {
            Some(person_rows) => {
                matched_cases += 1;
                for &p in person_rows {
                    rows.push(merged_row(cases, case_row, Some((people, p))));
                }
                if person_rows.len() > 1 {
                    if let Some(k) = key.as_deref() {
                        if seen_fan_out.insert(k.to_string()) {
                            let distinct_people = person_rows.iter().collect::<HashSet<_>>().len();
                            tracing::warn!(
                                case_id = k,
                                matches = person_rows.len(),
                                people = distinct_people,
                                "case id matched by multiple person links, duplicating case row"
                            );
                            fanned_out_cases.push(FanOut {
                                case_id: k.to_string(),
                                matches: person_rows.len(),
                                people: distinct_people,
                            });
                        }
                    }
                }
            }
            None => rows.push(merged_row(cases, case_row, None)),
        }

        if let Some(k) = key {
            case_keys.insert(k);
        }
    }

    let orphan_case_ids: Vec<String> = by_case_id
        .keys()
        .filter(|id| !case_keys.contains(**id))
        .map(|id| id.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let diagnostics = JoinDiagnostics {
        case_rows: cases.len(),
        merged_rows: rows.len(),
        matched_cases,
        unmatched_cases: cases.len() - matched_cases,
        fanned_out_cases,
        extra_rows: rows.len() - cases.len(),
        orphan_case_ids,
        expansion: expansion.stats.clone(),
    };

    tracing::info!(
        cases = diagnostics.case_rows,
        merged = diagnostics.merged_rows,
        unmatched = diagnostics.unmatched_cases,
        fanned_out = diagnostics.fanned_out_cases.len(),
        "joined cases with personal records"
    );

    JoinOutput { merged: MergedTable { rows }, diagnostics }
}

fn merged_row(cases: &Table, case_row: usize, person: Option<(&Table, usize)>) -> MergedRow {
    let person_cell = |col: &str| match person {
        Some((people, p)) => people.get(p, col).clone(),
        None => Cell::Null,
    };

    let name = match person_cell(NAME) {
        Cell::Null => Cell::text(UNKNOWN_NAME),
        other => other,
    };

    MergedRow {
        case_row,
        person_row: person.map(|(_, p)| p),
        case_id: cases.get(case_row, CASES_ID).clone(),
        name,
        phone_number: person_cell(PHONE_NUMBER),
        address: person_cell(ADDRESS),
        case_title: cases.get(case_row, CASE_TITLE).clone(),
        case_type: cases.get(case_row, CASE_TYPE).clone(),
        case_status: cases.get(case_row, CASE_STATUS).clone(),
        case_labels: cases.get(case_row, CASE_LABELS).clone(),
    }
}
