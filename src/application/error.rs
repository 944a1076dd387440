//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors carry domain errors with the table they came from and add
/// application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    /// Format error in one of the input tables.
    #[error("{table}: {source}")]
    Format {
        table: String,
        #[source]
        source: DomainError,
    },

    #[error("fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("{context}: {source}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// Attach the table name to a domain error.
    pub fn format(table: impl Into<String>, source: DomainError) -> Self {
        Self::Format {
            table: table.into(),
            source,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
