// Dashboard settings
// Loaded from ~/.config/caseboard/settings.toml

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Published export of the cases sheet
pub const DEFAULT_CASES_SOURCE: &str = "https://docs.google.com/spreadsheets/d/1rrxzW09wrNTqw-PNfv_bb3yWop8DX4XLwWFOXMj5vSw/export?format=csv&gid=508184829";

/// Published export of the personal-info sheet
pub const DEFAULT_PERSONAL_SOURCE: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vTdGb0-8t5D17_OHHcgGZ95Is7dYpXmzU2f7_BCdVvkyxq7vOb7W2oVPCm86eD7zVbvkqJWOIIF0_6D/pub?output=csv";

/// Where the two tables are read from (URL or local path).
///
/// `None` means the file does not set the key; the built-in source applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cases: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Per-request timeout; a hung source fails the cycle after this long
    pub timeout_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Merged rows printed by `report` (0 = all)
    pub max_rows: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { max_rows: 0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sources: SourceSettings,
    pub fetch: FetchSettings,
    pub display: DisplaySettings,
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("caseboard")
            .join("settings.toml")
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })
    }

    /// Load settings from `path`. A missing file yields the defaults; an
    /// unreadable or invalid one is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })
    }

    /// Render as TOML; unset source keys are omitted
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })
    }
}
