use serde::Serialize;

use crate::case_list::{classify_case_list, CaseListField};
use crate::columns::CASES_ID;
use crate::table::Table;

/// One (person, case id) pair. `case_id` is `None` for a person with no
/// usable case ids; such links never match a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonCaseLink {
    /// Row index into the personal table
    pub person_row: usize,
    pub case_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpansionStats {
    pub people: usize,
    pub links: usize,
    pub blank_fields: usize,
    pub malformed_fields: usize,
    /// People left with only the placeholder link
    pub unlinked_people: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub links: Vec<PersonCaseLink>,
    pub stats: ExpansionStats,
}

/// Expand each person into one link per case id listed in `Cases Id`.
///
/// Ids are trimmed; ids blank after trimming are dropped. A person with no
/// remaining ids still yields exactly one placeholder link.
pub fn expand_people(people: &Table) -> Expansion {
    let mut links = Vec::with_capacity(people.len());
    let mut stats = ExpansionStats { people: people.len(), ..Default::default() };

    for (row, cell) in people.column(CASES_ID).enumerate() {
        let raw = cell.as_string();
        let ids = match classify_case_list(raw.as_deref()) {
            CaseListField::Blank => {
                stats.blank_fields += 1;
                Vec::new()
            }
            CaseListField::Malformed(err) => {
                stats.malformed_fields += 1;
                tracing::warn!(
                    person_row = row,
                    raw = raw.as_deref().unwrap_or(""),
                    error = %err,
                    "malformed case list, treating as no cases"
                );
                Vec::new()
            }
            CaseListField::Parsed(ids) => ids,
        };

        let before = links.len();
        links.extend(
            ids.iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(|id| PersonCaseLink { person_row: row, case_id: Some(id.to_string()) }),
        );

        if links.len() == before {
            stats.unlinked_people += 1;
            links.push(PersonCaseLink { person_row: row, case_id: None });
        }
    }

    stats.links = links.len();
    tracing::debug!(
        people = stats.people,
        links = stats.links,
        malformed = stats.malformed_fields,
        "expanded personal records"
    );
    Expansion { links, stats }
}
