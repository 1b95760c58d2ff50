use std::fmt;

use thiserror::Error;

/// Which of the two dashboard tables a load was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Cases,
    Personal,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cases => "cases",
            Self::Personal => "personal",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    /// The source could not be fetched or is not delimited text.
    #[error("{dataset} data unavailable from {location}: {reason}")]
    DataUnavailable {
        dataset: Dataset,
        location: String,
        reason: String,
    },
    /// The source string is neither a URL nor a usable path.
    #[error("invalid source {input:?}: {reason}")]
    InvalidSource { input: String, reason: String },
    /// HTTP client could not be constructed (TLS backend, etc.).
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl LoadError {
    pub fn dataset(&self) -> Option<Dataset> {
        match self {
            Self::DataUnavailable { dataset, .. } => Some(*dataset),
            _ => None,
        }
    }
}
