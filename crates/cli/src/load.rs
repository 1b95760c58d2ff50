// Source resolution and the fetch-and-join cycle

use std::path::PathBuf;
use std::time::Duration;

use caseboard_config::settings::{DEFAULT_CASES_SOURCE, DEFAULT_PERSONAL_SOURCE};
use caseboard_config::Settings;
use caseboard_engine::Snapshot;
use caseboard_io::{FetchOptions, Loader, Source};

use crate::{CliError, GlobalArgs};

/// Where a resolved value came from (shown by `caseboard sources`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Flag,
    Settings,
    Default,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Flag => "flag/env",
            Origin::Settings => "settings",
            Origin::Default => "default",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resolved {
    pub settings_path: PathBuf,
    pub settings_exists: bool,
    pub cases: Source,
    pub cases_origin: Origin,
    pub personal: Source,
    pub personal_origin: Origin,
    pub fetch: FetchOptions,
    pub max_rows: usize,
}

/// Resolve sources and options: flag, then env (both via clap), then the
/// settings file, then the built-in default.
pub fn resolve(args: &GlobalArgs) -> Result<Resolved, CliError> {
    let (settings_path, explicit) = match &args.config {
        Some(path) => (path.clone(), true),
        None => (Settings::config_path(), false),
    };
    let settings_exists = settings_path.is_file();
    if explicit && !settings_exists {
        return Err(CliError::config(format!(
            "settings file not found: {}",
            settings_path.display()
        )));
    }

    let settings = Settings::load_from(&settings_path).map_err(CliError::settings)?;

    let (cases, cases_origin) =
        pick(args.cases.as_deref(), settings.sources.cases.as_deref(), DEFAULT_CASES_SOURCE);
    let (personal, personal_origin) = pick(
        args.personal.as_deref(),
        settings.sources.personal.as_deref(),
        DEFAULT_PERSONAL_SOURCE,
    );

    let timeout_secs = args.timeout.unwrap_or(settings.fetch.timeout_secs).max(1);

    let resolved = Resolved {
        settings_path,
        settings_exists,
        cases: Source::parse(cases).map_err(CliError::load)?,
        cases_origin,
        personal: Source::parse(personal).map_err(CliError::load)?,
        personal_origin,
        fetch: FetchOptions {
            timeout: Duration::from_secs(timeout_secs),
            ..FetchOptions::default()
        },
        max_rows: settings.display.max_rows,
    };
    tracing::debug!(
        cases = %resolved.cases,
        personal = %resolved.personal,
        timeout_secs,
        settings = %resolved.settings_path.display(),
        "resolved sources"
    );
    Ok(resolved)
}

/// A key present in the settings file is `Settings` even when it repeats the default.
fn pick<'a>(
    flag: Option<&'a str>,
    from_settings: Option<&'a str>,
    default: &'a str,
) -> (&'a str, Origin) {
    match (flag, from_settings) {
        (Some(v), _) => (v, Origin::Flag),
        (None, Some(v)) => (v, Origin::Settings),
        (None, None) => (default, Origin::Default),
    }
}

/// One full cycle: fetch both tables, expand and join. Nothing is cached.
pub fn run_cycle(resolved: &Resolved) -> Result<Snapshot, CliError> {
    let loader = Loader::new(&resolved.fetch).map_err(CliError::load)?;
    let sources = loader
        .load_sources(&resolved.cases, &resolved.personal)
        .map_err(CliError::load)?;
    let snapshot = Snapshot::build(sources);
    tracing::info!(
        merged_rows = snapshot.merged.len(),
        unmatched = snapshot.diagnostics.unmatched_cases,
        "cycle complete"
    );
    Ok(snapshot)
}
