//! Tech tree visualizer: joins a tech tree table with a parts catalog and
//! renders the result through Graphviz.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
