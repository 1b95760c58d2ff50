//! CLI Exit Code Registry
//!
//! Single source of truth for `caseboard` exit codes. Scripts that wrap
//! `caseboard report` rely on these values.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain      | Description                                 |
//! |---------|-------------|---------------------------------------------|
//! | 0       | Universal   | Success                                     |
//! | 1       | Universal   | General error (unspecified)                 |
//! | 2       | Universal   | CLI usage error (bad args)                  |
//! | 3-9     | local       | Settings, output files, terminal            |
//! | 50-59   | sources     | Remote/local data sources                   |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `CliError`

use caseboard_io::{Dataset, LoadError};

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown filter value.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Local (3-9)
// =============================================================================

/// Settings file unreadable or invalid TOML.
pub const EXIT_CONFIG: u8 = 3;

/// Cannot write an output file (`merged -o`, `--log-file`).
pub const EXIT_OUTPUT_IO: u8 = 4;

/// Terminal setup or drawing failed (dashboard only).
pub const EXIT_TERMINAL: u8 = 5;

// =============================================================================
// Sources (50-59)
// =============================================================================

/// Cases table could not be fetched or parsed.
pub const EXIT_CASES_UNAVAILABLE: u8 = 50;

/// Personal-info table could not be fetched or parsed.
pub const EXIT_PERSONAL_UNAVAILABLE: u8 = 51;

/// Map a loader error to its exit code.
pub fn load_exit_code(err: &LoadError) -> u8 {
    match err.dataset() {
        Some(Dataset::Cases) => EXIT_CASES_UNAVAILABLE,
        Some(Dataset::Personal) => EXIT_PERSONAL_UNAVAILABLE,
        None => match err {
            LoadError::InvalidSource { .. } => EXIT_USAGE,
            _ => EXIT_ERROR,
        },
    }
}
