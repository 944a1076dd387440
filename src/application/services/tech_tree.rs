//! Tech tree loading service
//!
//! Reads the tech-tree and parts tables from their sources and joins them.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::error_ext::{IoResultExt, TableResultExt};
use crate::application::{ApplicationError, ApplicationResult, DataSource};
use crate::domain::{
    assign_parts, build_tech_tree, parse_parts, Assignment, Part, Table, TechTree,
};
use crate::infrastructure::traits::{FileSystem, Fetcher};

pub const TECH_TREE_TABLE: &str = "tech tree";
pub const PARTS_TABLE: &str = "parts catalog";

/// Service for loading and joining the two input tables.
pub struct TechTreeService {
    fs: Arc<dyn FileSystem>,
    fetcher: Arc<dyn Fetcher>,
}

impl TechTreeService {
    /// Create a new tech tree service.
    pub fn new(fs: Arc<dyn FileSystem>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fs, fetcher }
    }

    /// Resolve a user-supplied descriptor, relative paths against `base`.
    pub fn probe(&self, descriptor: &str, base: &Path) -> DataSource {
        DataSource::probe(descriptor, base, self.fs.as_ref())
    }

    /// Get the raw text of a source.
    ///
    /// Remote fetch failures are returned as-is; there is no retry.
    pub fn read_source(&self, source: &DataSource) -> ApplicationResult<String> {
        debug!("read_source: {}", source);
        match source {
            DataSource::Remote(url) => {
                self.fetcher
                    .fetch_text(url)
                    .map_err(|message| ApplicationError::Fetch {
                        url: url.clone(),
                        message,
                    })
            }
            DataSource::Path(path) => self
                .fs
                .read_to_string(path)
                .with_path_context("read table", path),
            DataSource::Inline(text) => Ok(text.clone()),
        }
    }

    fn load_table(&self, source: &DataSource, table: &str) -> ApplicationResult<Table> {
        let text = self.read_source(source)?;
        let parsed = Table::parse(&text).in_table(table)?;
        debug!("load_table: {} rows in {}", parsed.len(), table);
        Ok(parsed)
    }

    /// Load the tech tree (nodes with empty part lists).
    pub fn load_tech_tree(&self, source: &DataSource) -> ApplicationResult<TechTree> {
        let table = self.load_table(source, TECH_TREE_TABLE)?;
        build_tech_tree(&table).in_table(TECH_TREE_TABLE)
    }

    /// Load the parts catalog.
    pub fn load_parts(&self, source: &DataSource) -> ApplicationResult<Vec<Part>> {
        let table = self.load_table(source, PARTS_TABLE)?;
        parse_parts(&table).in_table(PARTS_TABLE)
    }

    /// Load both tables and assign parts to their tech nodes.
    ///
    /// Both tables are fully read and validated before anything is returned,
    /// so a format error in either leaves no partial result.
    #[instrument(skip_all, fields(tech_tree = %tech_tree, parts = %parts))]
    pub fn assemble(
        &self,
        tech_tree: &DataSource,
        parts: &DataSource,
    ) -> ApplicationResult<Assignment> {
        let mut tree = self.load_tech_tree(tech_tree)?;
        let parts = self.load_parts(parts)?;
        let part_count = parts.len();

        let unassigned = assign_parts(&mut tree, parts);
        info!(
            "assemble: {} nodes, {} parts, {} unassigned",
            tree.len(),
            part_count,
            unassigned.len()
        );

        Ok(Assignment {
            tree,
            unassigned,
            part_count,
        })
    }
}
