//! `caseboard-io`: record loader.
//!
//! Resolves a source (URL or local path), fetches it once, and parses the
//! delimited text into a [`Table`]. Every failure surfaces as
//! [`LoadError::DataUnavailable`].

pub mod csv;
pub mod error;
pub mod fetch;
pub mod source;

use caseboard_engine::{Sources, Table};

pub use error::{Dataset, LoadError};
pub use fetch::{FetchOptions, SourceClient};
pub use source::Source;

/// Loads the cases and personal tables for one render cycle.
pub struct Loader {
    client: SourceClient,
}

impl Loader {
    pub fn new(options: &FetchOptions) -> Result<Self, LoadError> {
        Ok(Self { client: SourceClient::new(options)? })
    }

    /// Fetch and parse one table.
    pub fn load_table(&self, dataset: Dataset, source: &Source) -> Result<Table, LoadError> {
        let unavailable = |reason: String| LoadError::DataUnavailable {
            dataset,
            location: source.to_string(),
            reason,
        };

        let text = self.client.fetch_text(source).map_err(unavailable)?;
        let table = crate::csv::parse_table(&text).map_err(unavailable)?;

        tracing::info!(
            dataset = dataset.as_str(),
            source = %source,
            rows = table.len(),
            columns = table.width(),
            "loaded table"
        );
        Ok(table)
    }

    /// Fetch both tables: cases first, then personal. The first failure wins.
    pub fn load_sources(&self, cases: &Source, personal: &Source) -> Result<Sources, LoadError> {
        let cases = self.load_table(Dataset::Cases, cases)?;
        let people = self.load_table(Dataset::Personal, personal)?;
        Ok(Sources { cases, people })
    }
}
