//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors are format violations in the input tables.
/// Every variant carries the source line so the offending row can be found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("line {line}: missing column '{column}'")]
    MissingColumn { line: usize, column: String },

    #[error("line {line}: tier is not an integer: '{value}'")]
    InvalidTier { line: usize, value: String },

    #[error("line {line}: duplicate tech node '{name}'")]
    DuplicateNode { line: usize, name: String },

    #[error("line {line}: quoted field is never closed")]
    UnterminatedQuote { line: usize },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
