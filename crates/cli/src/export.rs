// `caseboard merged`: export the merged display table

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;

use caseboard_engine::columns::DISPLAY_COLUMNS;
use caseboard_engine::MergedTable;

use crate::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// CSV with the seven display columns; nulls are empty fields.
pub fn write_csv(w: impl Write, merged: &MergedTable) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(DISPLAY_COLUMNS)?;
    for row in &merged.rows {
        wtr.write_record(row.display_cells().iter().map(|c| c.display()))?;
    }
    wtr.flush()
}

/// JSON array of objects keyed by display column; nulls stay `null`.
pub fn write_json(mut w: impl Write, merged: &MergedTable) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut w, merged).map_err(io::Error::from)?;
    writeln!(w)
}

pub fn export(merged: &MergedTable, format: ExportFormat, output: Option<&Path>) -> Result<(), CliError> {
    let result = match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::output(format!("cannot create {}: {}", path.display(), e))
            })?;
            write_to(BufWriter::new(file), merged, format)
        }
        None => write_to(io::stdout().lock(), merged, format),
    };
    result.map_err(|e| CliError::output(format!("write failed: {}", e)))?;

    if let Some(path) = output {
        tracing::info!(rows = merged.len(), path = %path.display(), "exported merged table");
    }
    Ok(())
}

fn write_to(mut w: impl Write, merged: &MergedTable, format: ExportFormat) -> io::Result<()> {
    match format {
        ExportFormat::Csv => write_csv(&mut w, merged)?,
        ExportFormat::Json => write_json(&mut w, merged)?,
    }
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseboard_engine::{join_cases, Table};

    fn merged() -> MergedTable {
        let cases = Table::from_text_rows(
            vec!["Cases Id".into(), "Case Title".into(), "Case Type".into()],
            vec![
                vec!["A1".into(), "Lease, renewal".into(), "Housing".into()],
                vec!["A2".into(), "Assault".into(), "Criminal".into()],
            ],
        );
        let people = Table::from_text_rows(
            vec!["Name".into(), "Phone Number".into(), "Cases Id".into()],
            vec![vec!["Jo".into(), "555-0100".into(), "['A1']".into()]],
        );
        join_cases(&cases, &people).merged
    }

    #[test]
    fn csv_has_display_header_and_quotes_commas() {
        let mut out = Vec::new();
        write_csv(&mut out, &merged()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Name,Phone Number,Address,Case Title,Case Type,Case Status,Case Labels")
        );
        assert_eq!(lines.next(), Some("Jo,555-0100,,\"Lease, renewal\",Housing,,"));
        assert_eq!(lines.next(), Some("Unknown,,,Assault,Criminal,,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn json_is_array_of_display_objects() {
        let mut out = Vec::new();
        write_json(&mut out, &merged()).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let rows = v.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Case Title"], "Lease, renewal");
        assert!(rows[1]["Address"].is_null());
        assert!(rows[0].get("Cases Id").is_none());
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged.csv");
        export(&merged(), ExportFormat::Csv, Some(&path)).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Name,"));
    }

    #[test]
    fn export_to_missing_dir_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/merged.csv");
        let err = export(&merged(), ExportFormat::Json, Some(&path)).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_OUTPUT_IO);
    }
}
