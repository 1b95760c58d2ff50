//! Single-attempt blocking fetch of a source into text.
//!
//! No retries: a failed attempt is reported to the caller as-is and the
//! render cycle fails.

use std::io::Read;
use std::time::Duration;

use url::Url;

use crate::csv::{decode_text, read_file_as_utf8};
use crate::error::LoadError;
use crate::source::Source;

pub const USER_AGENT: &str = concat!("caseboard/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const MAX_RESPONSE_BYTES: usize = 32 * 1024 * 1024; // 32 MB

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub max_bytes: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_bytes: MAX_RESPONSE_BYTES,
        }
    }
}

pub struct SourceClient {
    http: reqwest::blocking::Client,
    max_bytes: usize,
}

impl SourceClient {
    pub fn new(options: &FetchOptions) -> Result<Self, LoadError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(options.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LoadError::Client(e.to_string()))?;
        Ok(Self { http, max_bytes: options.max_bytes })
    }

    /// Fetch a source as UTF-8 text. Errors are human-readable reasons.
    pub fn fetch_text(&self, source: &Source) -> Result<String, String> {
        match source {
            Source::Url(url) => self.fetch_url(url),
            Source::Path(path) => {
                read_file_as_utf8(path).map_err(|e| format!("cannot read {}: {}", path.display(), e))
            }
        }
    }

    fn fetch_url(&self, url: &Url) -> Result<String, String> {
        tracing::debug!(%url, "fetching source");

        let resp = self
            .http
            .get(url.clone())
            .send()
            .map_err(|e| format!("request failed: {}", e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        let is_html = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("text/html"))
            .unwrap_or(false);
        if is_html {
            return Err("response is an HTML page, not delimited text (is the sheet published as CSV?)".into());
        }

        if let Some(len) = resp.content_length() {
            if len as usize > self.max_bytes {
                return Err(format!("response too large ({} bytes, limit {})", len, self.max_bytes));
            }
        }

        let mut bytes = Vec::new();
        resp.take(self.max_bytes as u64 + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| format!("failed to read response body: {}", e))?;
        if bytes.len() > self.max_bytes {
            return Err(format!("response exceeds {} bytes", self.max_bytes));
        }

        Ok(decode_text(bytes))
    }
}
