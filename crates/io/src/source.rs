use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::error::LoadError;

/// Where a table comes from: a remote export or a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(Url),
    Path(PathBuf),
}

impl Source {
    /// `http(s)://` is remote, `file://` and anything else is a local path.
    pub fn parse(input: &str) -> Result<Self, LoadError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LoadError::InvalidSource {
                input: input.to_string(),
                reason: "empty source".into(),
            });
        }

        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(trimmed).map_err(|e| LoadError::InvalidSource {
                input: input.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(Source::Url(url));
        }

        if lower.starts_with("file://") {
            let url = Url::parse(trimmed).map_err(|e| LoadError::InvalidSource {
                input: input.to_string(),
                reason: e.to_string(),
            })?;
            let path = url.to_file_path().map_err(|_| LoadError::InvalidSource {
                input: input.to_string(),
                reason: "file URL has no local path".into(),
            })?;
            return Ok(Source::Path(path));
        }

        Ok(Source::Path(PathBuf::from(trimmed)))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}
