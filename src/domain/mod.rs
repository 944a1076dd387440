//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod dot;
pub mod entities;
pub mod error;
pub mod graph;
pub mod table;

pub use builder::{assign_parts, build_tech_tree, parse_parts};
pub use dot::to_dot;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use graph::{GraphModel, GraphStyle};
pub use table::{Record, Table};

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
///
/// Falls back to the input unchanged when a variable is undefined.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
