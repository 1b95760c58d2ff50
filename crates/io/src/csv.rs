// Delimited-text parsing into typed tables

use std::collections::HashMap;
use std::path::Path;

use caseboard_engine::Table;

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: (number of lines with same field count as line 1) * field_count
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Convert raw bytes to UTF-8 (falls back to Windows-1252, common for Excel-exported CSVs).
pub fn decode_text(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    Ok(decode_text(bytes))
}

/// True when the body is an HTML page rather than an export (e.g. a sign-in page).
pub fn looks_like_html(content: &str) -> bool {
    let head: String = content.trim_start().chars().take(15).collect::<String>().to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

/// Parse delimited text: first record is the header, remaining records are rows.
///
/// Blank header cells become `Unnamed: <index>`; repeated names get `.1`, `.2`, ...
/// Column types are inferred per column (see [`Table::from_text_rows`]).
pub fn parse_table(content: &str) -> Result<Table, String> {
    if looks_like_html(content) {
        return Err("response is an HTML page, not delimited text".into());
    }

    let delimiter = sniff_delimiter(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(result) => result.map_err(|e| format!("CSV parse error: {}", e))?,
        None => return Err("no header row".into()),
    };
    let columns = header_names(header.iter());

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in records {
        let record = result.map_err(|e| format!("CSV parse error: {}", e))?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    Ok(Table::from_text_rows(columns, rows))
}

fn header_names<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.enumerate()
        .map(|(i, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name.to_string()
            };
            let n = seen.entry(base.clone()).or_insert(0);
            let out = if *n == 0 { base } else { format!("{}.{}", base, n) };
            *n += 1;
            out
        })
        .collect()
}
