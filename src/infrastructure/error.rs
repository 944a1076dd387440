//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// Infrastructure errors wrap application errors and add concerns of the
/// external tools the application drives.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Graphviz ran but exited unsuccessfully.
    #[error("graphviz failed{}: {message}", exit_suffix(.exit_code))]
    Render {
        message: String,
        exit_code: Option<i32>,
    },
}

fn exit_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" (exit {c})")).unwrap_or_default()
}
