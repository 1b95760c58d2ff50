// caseboard - legal-intake dashboard: cases joined with client records

mod exit_codes;
mod export;
mod load;
mod logging;
mod report;
mod tui;
mod util;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use caseboard_config::settings::{DisplaySettings, FetchSettings, SourceSettings};
use caseboard_config::{ConfigError, Settings};
use caseboard_engine::{CaseFilter, Selection, Snapshot};
use caseboard_io::LoadError;

use exit_codes::{
    load_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_OUTPUT_IO, EXIT_SUCCESS, EXIT_TERMINAL, EXIT_USAGE,
};
use export::ExportFormat;
use load::Resolved;
use logging::LogTarget;

#[derive(Parser)]
#[command(name = "caseboard")]
#[command(about = "Legal-intake dashboard: cases joined with client records")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct GlobalArgs {
    /// Cases table: URL or local CSV path
    #[arg(long, global = true, env = "CASEBOARD_CASES", value_name = "SRC")]
    pub cases: Option<String>,

    /// Personal-info table: URL or local CSV path
    #[arg(long, global = true, env = "CASEBOARD_PERSONAL", value_name = "SRC")]
    pub personal: Option<String>,

    /// Settings file (default: <config dir>/caseboard/settings.toml)
    #[arg(long, global = true, env = "CASEBOARD_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Per-request fetch timeout in seconds
    #[arg(long, global = true, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to FILE instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive dashboard (filters, counters, charts, merged table)
    #[command(after_help = "\
Keys:
  t / T    next/prev case type      s / S    next/prev case status
  a        reset filters            r        reload both sources
  ?        help                     q / Esc  quit")]
    Dashboard,

    /// Print counters, chart data and the merged table
    #[command(after_help = "\
Examples:
  caseboard report
  caseboard report --type Housing --status Open
  caseboard report --json --max-rows 20 | jq .metrics
  caseboard --cases cases.csv --personal people.csv report")]
    Report {
        /// Case type filter (default: All)
        #[arg(long = "type", value_name = "TYPE", default_value = "All")]
        case_type: String,

        /// Case status filter (default: All)
        #[arg(long = "status", value_name = "STATUS", default_value = "All")]
        case_status: String,

        /// Output one JSON document
        #[arg(long)]
        json: bool,

        /// Merged rows to print (0 = all; default from settings)
        #[arg(long, value_name = "N")]
        max_rows: Option<usize>,
    },

    /// Export the merged cases table
    #[command(after_help = "\
Examples:
  caseboard merged > merged.csv
  caseboard merged --format json -o merged.json")]
    Merged {
        #[arg(long, short = 'f', value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show resolved sources and the effective settings
    Sources,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("CASEBOARD_GIT_HASH"), ")",
        "\nengine:  caseboard-engine ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("CASEBOARD_TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            eprintln!("Usage: caseboard <command> [options]");
            eprintln!("       caseboard --help for more information");
            Ok(())
        }
        Some(command) => run(&cli.global, command),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(global: &GlobalArgs, command: Commands) -> Result<(), CliError> {
    let log_target = match (&global.log_file, &command) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, Commands::Dashboard) => LogTarget::Discard,
        (None, _) => LogTarget::Stderr,
    };
    logging::init(global.verbose, log_target)?;

    let resolved = load::resolve(global)?;
    match command {
        Commands::Dashboard => cmd_dashboard(&resolved),
        Commands::Report { case_type, case_status, json, max_rows } => {
            let max_rows = max_rows.unwrap_or(resolved.max_rows);
            cmd_report(&resolved, &case_type, &case_status, json, max_rows)
        }
        Commands::Merged { format, output } => {
            let snapshot = load::run_cycle(&resolved)?;
            export::export(&snapshot.merged, format, output.as_deref())
        }
        Commands::Sources => cmd_sources(&resolved),
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT_IO, message: msg.into(), hint: None }
    }

    pub fn terminal(msg: impl Into<String>) -> Self {
        Self { code: EXIT_TERMINAL, message: msg.into(), hint: None }
    }

    pub fn settings(err: ConfigError) -> Self {
        Self::config(err.to_string())
            .with_hint("fix or remove the file; every key is optional")
    }

    /// Loader error with the exit code for the failing dataset.
    pub fn load(err: LoadError) -> Self {
        let hint = match &err {
            LoadError::DataUnavailable { dataset, .. } => Some(format!(
                "check --{} / CASEBOARD_{} or [sources] in the settings file",
                dataset,
                dataset.as_str().to_ascii_uppercase()
            )),
            LoadError::InvalidSource { .. } => {
                Some("a source is an http(s):// URL, a file:// URL or a path".to_string())
            }
            LoadError::Client(_) => None,
        };
        Self { code: load_exit_code(&err), message: err.to_string(), hint }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::BrokenPipe {
            // Downstream closed (e.g. `| head`); nothing left to report
            return Self { code: EXIT_SUCCESS, message: String::new(), hint: None };
        }
        Self { code: EXIT_ERROR, message: e.to_string(), hint: None }
    }
}

// ============================================================================
// dashboard
// ============================================================================

fn cmd_dashboard(resolved: &Resolved) -> Result<(), CliError> {
    let snapshot = load::run_cycle(resolved)?;
    let label = format!("{} + {}", short_source(&resolved.cases), short_source(&resolved.personal));
    tui::run(snapshot, label, || load::run_cycle(resolved).map_err(|e| e.message))
        .map_err(CliError::terminal)
}

fn short_source(source: &caseboard_io::Source) -> String {
    match source {
        caseboard_io::Source::Url(url) => url.host_str().unwrap_or("remote").to_string(),
        caseboard_io::Source::Path(path) => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
    }
}

// ============================================================================
// report
// ============================================================================

/// Filter value from the command line; must be one of the loaded options.
fn pick_option(options: &[String], value: &str, flag: &str) -> Result<Selection, CliError> {
    if options.iter().any(|o| o == value) {
        // Infallible: every string maps to All or Exact
        return Ok(value.parse().unwrap_or_default());
    }
    Err(CliError::args(format!("no cases with {} {:?}", flag, value))
        .with_hint(format!("available: {}", options.join(", "))))
}

fn cmd_report(
    resolved: &Resolved,
    case_type: &str,
    case_status: &str,
    json: bool,
    max_rows: usize,
) -> Result<(), CliError> {
    let snapshot: Snapshot = load::run_cycle(resolved)?;
    let filter = CaseFilter::new(
        pick_option(&snapshot.type_options, case_type, "--type")?,
        pick_option(&snapshot.status_options, case_status, "--status")?,
    );
    let view = snapshot.view(&filter);

    let mut out = io::stdout().lock();
    if json {
        report::write_json(&mut out, resolved, &snapshot, &view, max_rows)?;
    } else {
        report::write_text(&mut out, resolved, &snapshot, &view, max_rows)?;
    }
    out.flush()?;
    Ok(())
}

// ============================================================================
// sources
// ============================================================================

fn cmd_sources(resolved: &Resolved) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    let settings_state = if resolved.settings_exists { "" } else { " (not found, using defaults)" };
    writeln!(out, "settings: {}{}", resolved.settings_path.display(), settings_state)?;
    writeln!(out, "cases:    {} [{}]", resolved.cases, resolved.cases_origin.as_str())?;
    writeln!(out, "personal: {} [{}]", resolved.personal, resolved.personal_origin.as_str())?;
    writeln!(out, "timeout:  {}s", resolved.fetch.timeout.as_secs())?;
    writeln!(out)?;
    writeln!(out, "# effective settings")?;
    let toml = effective_settings(resolved).to_toml().map_err(|e| CliError::config(e.to_string()))?;
    write!(out, "{}", toml)?;
    Ok(())
}

/// Settings as resolved from every layer, in settings-file form.
fn effective_settings(resolved: &Resolved) -> Settings {
    Settings {
        sources: SourceSettings {
            cases: Some(resolved.cases.to_string()),
            personal: Some(resolved.personal.to_string()),
        },
        fetch: FetchSettings { timeout_secs: resolved.fetch.timeout.as_secs() },
        display: DisplaySettings { max_rows: resolved.max_rows },
    }
}
