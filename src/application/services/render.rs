//! Diagram rendering service
//!
//! Runs Graphviz on the DOT source and writes the image and the source next to
//! each other under a common base name.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::error_ext::IoResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{to_dot, GraphModel};
use crate::infrastructure::traits::{CommandRunner, FileSystem};
use crate::infrastructure::InfraError;

pub const SOURCE_EXTENSION: &str = "dot";

/// Where and how to write the diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
    pub dir: PathBuf,
    /// Base file name without extension
    pub name: String,
    /// Graphviz output format (png, svg, pdf, ...)
    pub format: String,
    /// Write only the DOT source, skip Graphviz
    pub source_only: bool,
}

impl OutputSpec {
    pub fn image_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.name, self.format))
    }

    pub fn source_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.name, SOURCE_EXTENSION))
    }
}

/// Files written by a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub source_path: PathBuf,
    /// `None` when only the source was requested
    pub image_path: Option<PathBuf>,
}

/// Service turning a graph model into files.
pub struct RenderService {
    fs: Arc<dyn FileSystem>,
    cmd: Arc<dyn CommandRunner>,
    dot_command: String,
}

impl RenderService {
    /// Create a render service invoking `dot_command` for layout.
    pub fn new(
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        dot_command: impl Into<String>,
    ) -> Self {
        Self {
            fs,
            cmd,
            dot_command: dot_command.into(),
        }
    }

    /// Lay out `source` with Graphviz, returning the image bytes.
    pub fn layout(&self, source: &str, format: &str) -> ApplicationResult<Vec<u8>> {
        let type_flag = format!("-T{format}");
        debug!("layout: {} {}", self.dot_command, type_flag);

        let output = self
            .cmd
            .run_with_stdin(&self.dot_command, &[&type_flag], source.as_bytes())
            .with_context(format!("run {}", self.dot_command))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ApplicationError::OperationFailed {
                context: format!("{} {}", self.dot_command, type_flag),
                source: Box::new(InfraError::Render {
                    message: stderr,
                    exit_code: output.status.code(),
                }),
            });
        }
        Ok(output.stdout)
    }

    /// Render the model and write the image and its DOT source.
    ///
    /// Nothing is written unless layout succeeds. If the second file cannot be
    /// written the first one is removed again.
    #[instrument(skip(self, model))]
    pub fn render(&self, model: &GraphModel, spec: &OutputSpec) -> ApplicationResult<RenderOutput> {
        let source = to_dot(model);
        let image = if spec.source_only {
            None
        } else {
            Some(self.layout(&source, &spec.format)?)
        };

        let source_path = spec.source_path();
        self.fs
            .ensure_parent(&source_path)
            .with_path_context("create output directory", &source_path)?;

        let image_path = match image {
            Some(bytes) => {
                let path = spec.image_path();
                self.write(&path, &bytes)?;
                Some(path)
            }
            None => None,
        };

        if let Err(e) = self.write(&source_path, source.as_bytes()) {
            if let Some(path) = &image_path {
                if let Err(cleanup) = self.fs.remove_file(path) {
                    warn!("render: cannot remove {}: {}", path.display(), cleanup);
                }
            }
            return Err(e);
        }

        Ok(RenderOutput {
            source_path,
            image_path,
        })
    }

    fn write(&self, path: &Path, content: &[u8]) -> ApplicationResult<()> {
        debug!("write: {} ({} bytes)", path.display(), content.len());
        self.fs
            .write_atomic(path, content)
            .with_path_context("write output", path)
    }
}
