//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{RenderService, TechTreeService};
use crate::config::Settings;
use crate::infrastructure::traits::{
    CommandRunner, Fetcher, FileSystem, HttpFetcher, RealCommandRunner, RealFileSystem,
};

/// Container holding the settings and the I/O implementations services share.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction (Graphviz)
    pub cmd: Arc<dyn CommandRunner>,

    /// Remote table fetcher
    pub fetcher: Arc<dyn Fetcher>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let fetcher = Arc::new(HttpFetcher::new(settings.fetch.timeout()));
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            fetcher,
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
            cmd,
            fetcher,
        }
    }

    pub fn tech_tree_service(&self) -> TechTreeService {
        TechTreeService::new(Arc::clone(&self.fs), Arc::clone(&self.fetcher))
    }

    pub fn render_service(&self) -> RenderService {
        RenderService::new(
            Arc::clone(&self.fs),
            Arc::clone(&self.cmd),
            self.settings.graphviz.command.clone(),
        )
    }
}
