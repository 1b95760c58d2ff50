use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// A row does not match the header width.
    #[error("row {row}: expected {expected} field(s), found {found}")]
    RaggedRow { row: usize, expected: usize, found: usize },
}
