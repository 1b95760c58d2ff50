use caseboard_engine::columns::DISPLAY_COLUMNS;
use caseboard_engine::{join_cases, CaseFilter, Cell, Selection, Snapshot, Sources, Table};

fn text_table(header: &[&str], rows: &[&[&str]]) -> Table {
    Table::from_text_rows(
        header.iter().map(|s| s.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
    )
}

#[test]
fn single_case_matched_to_person() {
    let cases = text_table(&["Cases Id", "Case Type", "Case Status"], &[&["A1", "Civil", "Open"]]);
    let people = text_table(&["Name", "Cases Id"], &[&["Jo", "['A1']"]]);

    let display = join_cases(&cases, &people).merged.display_table();
    assert_eq!(display.len(), 1);
    assert_eq!(display.get(0, "Name"), &Cell::text("Jo"));
    assert_eq!(display.get(0, "Case Type"), &Cell::text("Civil"));
    assert_eq!(display.get(0, "Case Status"), &Cell::text("Open"));
}

#[test]
fn single_case_without_people() {
    let cases = text_table(
        &["Cases Id", "Case Type", "Case Status"],
        &[&["A2", "Criminal", "Closed"]],
    );
    let people = text_table(&["Name", "Phone Number", "Address", "Cases Id"], &[]);

    let display = join_cases(&cases, &people).merged.display_table();
    assert_eq!(display.get(0, "Name"), &Cell::text("Unknown"));
    assert_eq!(display.get(0, "Case Type"), &Cell::text("Criminal"));
    assert!(display.get(0, "Phone Number").is_null());
    assert!(display.get(0, "Address").is_null());
}

#[test]
fn numeric_case_ids_join_with_listed_strings() {
    // A cases export whose ids are all digits loads as a numeric column
    let cases = text_table(&["Cases Id", "Case Title"], &[&["101", "Lease"], &["102", "Wage claim"]]);
    let people = text_table(&["Name", "Cases Id"], &[&["Jo", "['102']"]]);

    let merged = join_cases(&cases, &people).merged;
    assert_eq!(merged.rows[0].name, Cell::text("Unknown"));
    assert_eq!(merged.rows[1].name, Cell::text("Jo"));
}

#[test]
fn full_cycle_with_filters_and_diagnostics() {
    let cases = text_table(
        &["Cases Id", "Case Title", "Case Type", "Case Status", "Case Labels"],
        &[
            &["C1", "Eviction", "Housing", "Open", "urgent"],
            &["C2", "Assault", "Criminal", "Under Investigation", ""],
            &["C3", "Custody", "Family", "Closed", ""],
            &["C4", "Deposit", "Housing", "Open", ""],
        ],
    );
    let people = text_table(
        &["Name", "Phone Number", "Address", "Cases Id"],
        &[
            &["Ana", "555-0100", "1 Main St", "['C1', 'C4']"],
            &["Ben", "555-0101", "", "['C2']"],
            &["Cy", "", "", "['C2', 'C9']"],
            &["Di", "", "", "[C3,"],
            &["Ana", "", "", ""],
        ],
    );

    let snap = Snapshot::build(Sources { cases, people });
    assert_eq!(snap.merged.len(), 5); // C2 fans out to Ben and Cy
    assert_eq!(snap.diagnostics.fanned_out_cases.len(), 1);
    assert_eq!(snap.diagnostics.fanned_out_cases[0].case_id, "C2");
    assert_eq!(snap.diagnostics.orphan_case_ids, vec!["C9".to_string()]);
    assert_eq!(snap.diagnostics.expansion.malformed_fields, 1);
    assert_eq!(snap.diagnostics.expansion.blank_fields, 1);
    assert_eq!(snap.diagnostics.unmatched_cases, 1); // C3: Di's list is malformed

    let display = snap.merged.display_table();
    assert_eq!(display.columns().len(), DISPLAY_COLUMNS.len());
    assert_eq!(display.get(3, "Name"), &Cell::text("Unknown"));
    assert_eq!(display.get(3, "Case Title"), &Cell::text("Custody"));

    let all = snap.view(&CaseFilter::default());
    assert_eq!(all.metrics.total_cases, 4);
    assert_eq!(all.metrics.open, 2);
    assert_eq!(all.metrics.under_investigation, 1);
    assert_eq!(all.metrics.unique_clients, 4);
    assert_eq!(all.breakdown.by_type[0].label, "Housing");
    assert!((all.breakdown.by_type[0].percent - 50.0).abs() < 1e-9);

    let housing_open = snap.view(&CaseFilter::new(Selection::exact("Housing"), Selection::exact("Open")));
    assert_eq!(housing_open.metrics.total_cases, 2);
    assert_eq!(housing_open.breakdown.by_status.len(), 1);
    assert_eq!(housing_open.breakdown.by_status[0].count, 2);
    assert_eq!(housing_open.metrics.unique_clients, 4);
}
