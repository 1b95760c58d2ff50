//! `caseboard report`: the dashboard content as plain text or one JSON document.

use std::io::{self, Write};

use serde::Serialize;

use caseboard_engine::columns::DISPLAY_COLUMNS;
use caseboard_engine::{Bar, CaseFilter, FilteredView, JoinDiagnostics, MergedRow, Metrics, Slice, Snapshot};

use crate::load::Resolved;
use crate::util;

#[derive(Serialize)]
struct ReportMeta {
    sources: ReportSources,
    generated_at: String,
    version: &'static str,
    total_rows: usize,
    rows_shown: usize,
}

#[derive(Serialize)]
struct ReportSources {
    cases: String,
    personal: String,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    meta: ReportMeta,
    filter: &'a CaseFilter,
    metrics: &'a Metrics,
    by_type: &'a [Slice],
    by_status: &'a [Bar],
    diagnostics: &'a JoinDiagnostics,
    rows: &'a [MergedRow],
}

fn shown(snapshot: &Snapshot, max_rows: usize) -> usize {
    if max_rows == 0 {
        snapshot.merged.len()
    } else {
        max_rows.min(snapshot.merged.len())
    }
}

pub fn write_json(
    w: &mut impl Write,
    resolved: &Resolved,
    snapshot: &Snapshot,
    view: &FilteredView,
    max_rows: usize,
) -> io::Result<()> {
    let limit = shown(snapshot, max_rows);
    let doc = ReportJson {
        meta: ReportMeta {
            sources: ReportSources {
                cases: resolved.cases.to_string(),
                personal: resolved.personal.to_string(),
            },
            generated_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            version: env!("CARGO_PKG_VERSION"),
            total_rows: snapshot.merged.len(),
            rows_shown: limit,
        },
        filter: &view.filter,
        metrics: &view.metrics,
        by_type: &view.breakdown.by_type,
        by_status: &view.breakdown.by_status,
        diagnostics: &snapshot.diagnostics,
        rows: &snapshot.merged.rows[..limit],
    };
    serde_json::to_writer_pretty(&mut *w, &doc).map_err(io::Error::from)?;
    writeln!(w)
}

pub fn write_text(
    w: &mut impl Write,
    resolved: &Resolved,
    snapshot: &Snapshot,
    view: &FilteredView,
    max_rows: usize,
) -> io::Result<()> {
    writeln!(w, "Legal Intake Dashboard")?;
    writeln!(w, "cases:    {}", resolved.cases)?;
    writeln!(w, "personal: {}", resolved.personal)?;
    writeln!(
        w,
        "filter:   type={} status={}",
        view.filter.case_type, view.filter.case_status
    )?;
    writeln!(w)?;

    let m = &view.metrics;
    writeln!(w, "Total Cases          {}", m.total_cases)?;
    writeln!(w, "Open Cases           {}", m.open)?;
    writeln!(w, "Under Investigation  {}", m.under_investigation)?;
    writeln!(w, "Unique Clients       {}", m.unique_clients)?;
    writeln!(w)?;

    writeln!(w, "Cases by Type")?;
    let label_w = view
        .breakdown
        .by_type
        .iter()
        .map(|s| util::display_width(&s.label))
        .chain(view.breakdown.by_status.iter().map(|b| util::display_width(&b.label)))
        .max()
        .unwrap_or(0)
        .clamp(util::MIN_COL_WIDTH, util::MAX_COL_WIDTH);
    if view.breakdown.by_type.is_empty() {
        writeln!(w, "  (no cases)")?;
    }
    for slice in &view.breakdown.by_type {
        writeln!(
            w,
            "  {} {:>5}  {:>5.1}%",
            util::pad_right(&slice.label, label_w),
            slice.count,
            slice.percent
        )?;
    }
    writeln!(w)?;

    writeln!(w, "Cases by Status")?;
    if view.breakdown.by_status.is_empty() {
        writeln!(w, "  (no cases)")?;
    }
    let peak = view.breakdown.by_status.iter().map(|b| b.count).max().unwrap_or(0);
    for bar in &view.breakdown.by_status {
        let len = if peak == 0 { 0 } else { (bar.count * 30).div_ceil(peak) };
        writeln!(
            w,
            "  {} {:>5}  {}",
            util::pad_right(&bar.label, label_w),
            bar.count,
            "#".repeat(len)
        )?;
    }
    writeln!(w)?;

    let d = &snapshot.diagnostics;
    writeln!(
        w,
        "join: {} case rows -> {} merged rows ({} matched, {} unmatched, {} fanned out, {} extra rows)",
        d.case_rows,
        d.merged_rows,
        d.matched_cases,
        d.unmatched_cases,
        d.fanned_out_cases.len(),
        d.extra_rows
    )?;
    if d.expansion.malformed_fields > 0 || !d.orphan_case_ids.is_empty() {
        writeln!(
            w,
            "      {} malformed case lists, {} case ids not in the cases table",
            d.expansion.malformed_fields,
            d.orphan_case_ids.len()
        )?;
    }
    writeln!(w)?;

    writeln!(w, "Cases (with Personal Info)")?;
    write_merged_plain(w, snapshot, max_rows)
}

/// Merged table as an aligned plain-text grid (no TUI).
fn write_merged_plain(w: &mut impl Write, snapshot: &Snapshot, max_rows: usize) -> io::Result<()> {
    let limit = shown(snapshot, max_rows);
    let rows: Vec<Vec<String>> = snapshot.merged.rows[..limit]
        .iter()
        .map(|r| r.display_cells().iter().map(|c| c.display()).collect())
        .collect();
    let widths = util::column_widths(&DISPLAY_COLUMNS, &rows);

    let header: Vec<String> = DISPLAY_COLUMNS
        .iter()
        .zip(&widths)
        .map(|(name, &cw)| util::pad_right(name, cw))
        .collect();
    writeln!(w, "{}", header.join(" ").trim_end())?;
    let rule: Vec<String> = widths.iter().map(|&cw| "-".repeat(cw)).collect();
    writeln!(w, "{}", rule.join(" "))?;

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(value, &cw)| util::pad_right(value, cw))
            .collect();
        writeln!(w, "{}", line.join(" ").trim_end())?;
    }

    if limit < snapshot.merged.len() {
        writeln!(w, "... ({} more rows)", snapshot.merged.len() - limit)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseboard_engine::{Selection, Sources, Table};
    use caseboard_io::{FetchOptions, Source};
    use std::path::PathBuf;

    use crate::load::Origin;

    fn table(header: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_text_rows(
            header.iter().map(|s| s.to_string()).collect(),
            rows.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect(),
        )
    }

    fn fixture() -> (Resolved, Snapshot) {
        let cases = table(
            &["Cases Id", "Case Title", "Case Type", "Case Status", "Case Labels"],
            &[
                &["A1", "Eviction", "Housing", "Open", "urgent"],
                &["A2", "Assault", "Criminal", "Closed", ""],
            ],
        );
        let people = table(&["Name", "Phone Number", "Address", "Cases Id"], &[&["Jo", "555", "", "['A1']"]]);
        let resolved = Resolved {
            settings_path: PathBuf::from("settings.toml"),
            settings_exists: false,
            cases: Source::Path("cases.csv".into()),
            cases_origin: Origin::Flag,
            personal: Source::Path("personal.csv".into()),
            personal_origin: Origin::Flag,
            fetch: FetchOptions::default(),
            max_rows: 0,
        };
        (resolved, Snapshot::build(Sources { cases, people }))
    }

    #[test]
    fn json_has_contract_keys() {
        let (resolved, snap) = fixture();
        let view = snap.view(&CaseFilter::default());
        let mut out = Vec::new();
        write_json(&mut out, &resolved, &snap, &view, 0).unwrap();

        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        for key in ["meta", "filter", "metrics", "by_type", "by_status", "diagnostics", "rows"] {
            assert!(v.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(v["filter"]["case_type"], "All");
        assert_eq!(v["metrics"]["total_cases"], 2);
        assert_eq!(v["rows"][1]["Name"], "Unknown");
        assert!(v["rows"][1]["Phone Number"].is_null());
    }

    #[test]
    fn json_max_rows_limits_rows_only() {
        let (resolved, snap) = fixture();
        let view = snap.view(&CaseFilter::new(Selection::exact("Housing"), Selection::All));
        let mut out = Vec::new();
        write_json(&mut out, &resolved, &snap, &view, 1).unwrap();

        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(v["rows"].as_array().unwrap().len(), 1);
        assert_eq!(v["meta"]["total_rows"], 2);
        assert_eq!(v["metrics"]["total_cases"], 1);
    }

    #[test]
    fn text_lists_counters_and_table() {
        let (resolved, snap) = fixture();
        let view = snap.view(&CaseFilter::default());
        let mut out = Vec::new();
        write_text(&mut out, &resolved, &snap, &view, 1).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total Cases          2"));
        assert!(text.contains("Open Cases           1"));
        assert!(text.contains("Cases (with Personal Info)"));
        assert!(text.contains("Eviction"));
        assert!(!text.contains("Assault"));
        assert!(text.contains("... (1 more rows)"));
    }
}
