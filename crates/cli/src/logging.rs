// Diagnostic logging setup (tracing-subscriber)

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::CliError;

/// Where log events go.
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    /// Dashboard without `--log-file`: stderr would draw over the alternate screen.
    Discard,
}

/// Filter directives for `-v` count. `RUST_LOG` replaces these entirely.
pub fn default_directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => return "warn".to_string(),
        1 => "info",
        _ => "debug",
    };
    format!("warn,caseboard={level},caseboard_engine={level},caseboard_io={level}")
}

pub fn init(verbosity: u8, target: LogTarget) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    let (writer, ansi) = match target {
        LogTarget::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogTarget::Discard => (BoxMakeWriter::new(std::io::sink), false),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    CliError::output(format!("cannot open log file {}: {}", path.display(), e))
                })?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    };

    // A subscriber may already be installed (tests); keep the first one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .try_init();
    Ok(())
}
