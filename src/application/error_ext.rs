//! Error conversion helpers
//!
//! Extension traits that attach context when lifting lower-level results into
//! [`ApplicationResult`].

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::DomainResult;

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(&path)
    ///     .with_path_context("read table", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;

    /// Add free-form context to an I/O error.
    fn with_context(self, context: impl Into<String>) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.with_context(format!("{}: {}", action, path.display()))
    }

    fn with_context(self, context: impl Into<String>) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: context.into(),
            source: Box::new(e),
        })
    }
}

/// Extension trait naming the table a domain error came from.
pub trait TableResultExt<T> {
    fn in_table(self, table: &str) -> ApplicationResult<T>;
}

impl<T> TableResultExt<T> for DomainResult<T> {
    fn in_table(self, table: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::format(table, e))
    }
}
