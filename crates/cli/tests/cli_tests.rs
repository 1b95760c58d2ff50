// Integration tests for the `caseboard` binary against fixture files and mock HTTP sources.
// Run with: cargo test -p caseboard-cli --test cli_tests -- --nocapture
//
// Manual smoke test (needs a real TTY):
//   caseboard --cases tests/fixtures/cases.csv --personal tests/fixtures/personal.csv dashboard
//   Verify: t/s cycle filters, r reloads, q exits cleanly, terminal state restored.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use httpmock::prelude::*;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// `caseboard` with an empty settings file and no inherited source env vars.
fn caseboard(settings: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_caseboard"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("CASEBOARD_CASES")
        .env_remove("CASEBOARD_PERSONAL")
        .env_remove("CASEBOARD_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(settings);
    cmd
}

fn empty_settings(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "").unwrap();
    path
}

fn with_fixtures(cmd: &mut Command) -> &mut Command {
    cmd.arg("--cases")
        .arg(fixture("cases.csv"))
        .arg("--personal")
        .arg(fixture("personal.csv"))
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "exit code: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!("stdout must be JSON: {}\n{}", e, String::from_utf8_lossy(&output.stdout))
    })
}

// ---------------------------------------------------------------------------
// report --json
// ---------------------------------------------------------------------------

#[test]
fn report_json_metrics_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let output = with_fixtures(&mut caseboard(&empty_settings(&dir)))
        .args(["report", "--json"])
        .output()
        .expect("caseboard report --json");
    let v = stdout_json(&output);

    assert_eq!(v["metrics"]["total_cases"], 4);
    assert_eq!(v["metrics"]["open"], 2);
    assert_eq!(v["metrics"]["under_investigation"], 1);
    assert_eq!(v["metrics"]["unique_clients"], 4);
    assert_eq!(v["by_type"][0]["label"], "Housing");
    assert_eq!(v["by_type"][0]["count"], 2);

    let rows = v["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["Name"], "Ana Ruiz");
    assert_eq!(rows[1]["Case Title"], "Assault charge");
    assert_eq!(rows[3]["Name"], "Unknown");
    assert_eq!(rows[3]["Case Title"], "Custody dispute");

    assert_eq!(v["diagnostics"]["fanned_out_cases"][0]["case_id"], "C2");
    assert_eq!(v["diagnostics"]["orphan_case_ids"][0], "C9");
    assert_eq!(v["diagnostics"]["expansion"]["malformed_fields"], 1);
    assert!(v["meta"]["generated_at"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn report_json_filters_counters_not_rows() {
    let dir = tempfile::tempdir().unwrap();
    let output = with_fixtures(&mut caseboard(&empty_settings(&dir)))
        .args(["report", "--json", "--type", "Housing", "--status", "Open"])
        .output()
        .unwrap();
    let v = stdout_json(&output);

    assert_eq!(v["filter"]["case_type"], "Housing");
    assert_eq!(v["filter"]["case_status"], "Open");
    assert_eq!(v["metrics"]["total_cases"], 2);
    assert_eq!(v["metrics"]["under_investigation"], 0);
    assert_eq!(v["by_status"].as_array().unwrap().len(), 1);
    assert_eq!(v["rows"].as_array().unwrap().len(), 5);
}

#[test]
fn report_unknown_type_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = with_fixtures(&mut caseboard(&empty_settings(&dir)))
        .args(["report", "--type", "Tax"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("available: All, Criminal, Family, Housing"), "stderr: {stderr}");
}

#[test]
fn report_text_respects_max_rows() {
    let dir = tempfile::tempdir().unwrap();
    let output = with_fixtures(&mut caseboard(&empty_settings(&dir)))
        .args(["report", "--max-rows", "2"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Unique Clients       4"));
    assert!(stdout.contains("Eviction notice"));
    assert!(!stdout.contains("Deposit withheld"));
    assert!(stdout.contains("... (3 more rows)"));
}

// ---------------------------------------------------------------------------
// merged
// ---------------------------------------------------------------------------

#[test]
fn merged_csv_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("merged.csv");
    let output = with_fixtures(&mut caseboard(&empty_settings(&dir)))
        .args(["merged", "-o"])
        .arg(&out)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let text = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Name,Phone Number,Address,Case Title,Case Type,Case Status,Case Labels");
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[4], "Unknown,,,Custody dispute,Family,Closed,");
}

#[test]
fn merged_json_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let output = with_fixtures(&mut caseboard(&empty_settings(&dir)))
        .args(["merged", "--format", "json"])
        .output()
        .unwrap();
    let v = stdout_json(&output);
    assert_eq!(v.as_array().unwrap().len(), 5);
    assert_eq!(v[2]["Name"], "Cy Lam");
}

// ---------------------------------------------------------------------------
// errors and exit codes
// ---------------------------------------------------------------------------

#[test]
fn missing_cases_source_exits_50() {
    let dir = tempfile::tempdir().unwrap();
    let output = caseboard(&empty_settings(&dir))
        .arg("--cases")
        .arg(dir.path().join("nope.csv"))
        .arg("--personal")
        .arg(fixture("personal.csv"))
        .args(["report", "--json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(50));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: cases data unavailable"), "stderr: {stderr}");
    assert!(stderr.contains("hint:"));
}

#[test]
fn missing_personal_source_exits_51() {
    let dir = tempfile::tempdir().unwrap();
    let output = caseboard(&empty_settings(&dir))
        .arg("--cases")
        .arg(fixture("cases.csv"))
        .arg("--personal")
        .arg(dir.path().join("nope.csv"))
        .arg("merged")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(51));
}

#[test]
fn invalid_settings_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.toml");
    std::fs::write(&settings, "[sources\ncases = 1\n").unwrap();

    let output = caseboard(&settings).arg("sources").output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("settings.toml"));
}

#[test]
fn missing_explicit_settings_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let output = caseboard(&dir.path().join("absent.toml")).arg("sources").output().unwrap();
    assert_eq!(output.status.code(), Some(3));
}

// ---------------------------------------------------------------------------
// sources resolution
// ---------------------------------------------------------------------------

#[test]
fn sources_show_precedence() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.toml");
    std::fs::write(&settings, "[sources]\npersonal = \"/srv/people.csv\"\n").unwrap();

    let output = caseboard(&settings)
        .env("CASEBOARD_CASES", "/srv/cases.csv")
        .arg("sources")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cases:    /srv/cases.csv [flag/env]"), "stdout: {stdout}");
    assert!(stdout.contains("personal: /srv/people.csv [settings]"), "stdout: {stdout}");
    assert!(stdout.contains("timeout:  30s"));

    // effective settings are printed as a settings file
    let (_, toml) = stdout.split_once("# effective settings\n").unwrap();
    let effective: toml::Value = toml::from_str(toml).unwrap();
    assert_eq!(effective["sources"]["cases"].as_str(), Some("/srv/cases.csv"));
    assert_eq!(effective["sources"]["personal"].as_str(), Some("/srv/people.csv"));
    assert_eq!(effective["fetch"]["timeout_secs"].as_integer(), Some(30));
    assert_eq!(effective["display"]["max_rows"].as_integer(), Some(0));
}

#[test]
fn settings_supply_sources_for_report() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.toml");
    std::fs::write(
        &settings,
        format!(
            "[sources]\ncases = {:?}\npersonal = {:?}\n[display]\nmax_rows = 1\n",
            fixture("cases.csv").display().to_string(),
            fixture("personal.csv").display().to_string()
        ),
    )
    .unwrap();

    let output = caseboard(&settings).args(["report", "--json"]).output().unwrap();
    let v = stdout_json(&output);
    assert_eq!(v["rows"].as_array().unwrap().len(), 1);
    assert_eq!(v["meta"]["total_rows"], 5);
}

// ---------------------------------------------------------------------------
// remote sources
// ---------------------------------------------------------------------------

#[test]
fn report_over_http() {
    let server = MockServer::start();
    let cases = server.mock(|when, then| {
        when.method(GET).path("/cases.csv");
        then.status(200)
            .header("content-type", "text/csv")
            .body(std::fs::read_to_string(fixture("cases.csv")).unwrap());
    });
    let personal = server.mock(|when, then| {
        when.method(GET).path("/personal.csv");
        then.status(200)
            .header("content-type", "text/csv")
            .body(std::fs::read_to_string(fixture("personal.csv")).unwrap());
    });

    let dir = tempfile::tempdir().unwrap();
    let output = caseboard(&empty_settings(&dir))
        .arg("--cases")
        .arg(server.url("/cases.csv"))
        .arg("--personal")
        .arg(server.url("/personal.csv"))
        .args(["report", "--json"])
        .output()
        .unwrap();

    let v = stdout_json(&output);
    cases.assert();
    personal.assert();
    assert_eq!(v["metrics"]["total_cases"], 4);
    assert!(v["meta"]["sources"]["cases"].as_str().unwrap().starts_with("http://"));
}

#[test]
fn http_error_exits_50_without_fetching_personal() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/cases.csv");
        then.status(503);
    });
    let personal = server.mock(|when, then| {
        when.method(GET).path("/personal.csv");
        then.status(200).body("Name\n");
    });

    let dir = tempfile::tempdir().unwrap();
    let output = caseboard(&empty_settings(&dir))
        .arg("--cases")
        .arg(server.url("/cases.csv"))
        .arg("--personal")
        .arg(server.url("/personal.csv"))
        .arg("merged")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(50));
    assert!(String::from_utf8_lossy(&output.stderr).contains("HTTP 503"));
    personal.assert_calls(0);
}

#[test]
fn log_file_receives_events() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("caseboard.log");
    let output = with_fixtures(&mut caseboard(&empty_settings(&dir)))
        .arg("-v")
        .arg("--log-file")
        .arg(&log)
        .args(["report", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stderr.is_empty(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let text = std::fs::read_to_string(&log).unwrap();
    assert!(text.contains("loaded table"));
    // Di Moss's case list is malformed
    assert!(text.contains("WARN"));
}
