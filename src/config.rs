//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/techtree/techtree.toml`
//! 3. Local config: `<project_dir>/techtree.toml`
//! 4. Environment variables: `TECHTREE_*` prefix (`__` separates sections)
//! 5. Command-line overrides (applied by the CLI)

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, GraphStyle};

const BASE_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vRA2AQx4X9PZyyoU5mMV18MdB-OI50dx-AdShkBqMKqSaa8dFhb3USE5vtUF1JlPBjkTZFouuyF3Quj/pub?output=tsv";

/// Published sheet holding the tech tree.
pub fn default_tech_tree_source() -> String {
    format!("{BASE_URL}&gid=1681045610")
}

/// Published sheet holding the parts catalog.
pub fn default_parts_source() -> String {
    format!("{BASE_URL}&gid=22599298")
}

pub const LOCAL_CONFIG_FILE: &str = "techtree.toml";
pub const ENV_PREFIX: &str = "TECHTREE";

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the image and the DOT source
    pub dir: PathBuf,
    /// Base file name, extensions are added per file
    pub name: String,
    /// Graphviz output format
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            name: "tech_tree".into(),
            format: "png".into(),
        }
    }
}

/// Graphviz invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GraphvizConfig {
    /// Layout command (must accept `-T<format>` and DOT on stdin)
    pub command: String,
}

impl Default for GraphvizConfig {
    fn default() -> Self {
        Self {
            command: "dot".into(),
        }
    }
}

/// Remote fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Unified configuration for techtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Tech tree source: URL, file path or inline TSV
    pub tech_tree: String,
    /// Parts catalog source: URL, file path or inline TSV
    pub parts: String,
    pub output: OutputConfig,
    pub graphviz: GraphvizConfig,
    pub fetch: FetchConfig,
    pub style: GraphStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tech_tree: default_tech_tree_source(),
            parts: default_parts_source(),
            output: OutputConfig::default(),
            graphviz: GraphvizConfig::default(),
            fetch: FetchConfig::default(),
            style: GraphStyle::default(),
        }
    }
}

/// Get the XDG config directory for techtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "techtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("techtree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(LOCAL_CONFIG_FILE)
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `techtree.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        let local = project_dir
            .map(local_config_path)
            .filter(|p| p.exists());
        Self::load_from(global.as_deref(), local.as_deref(), true)
    }

    /// Load settings from explicit files.
    ///
    /// Files are layered in order (global, then local); environment variables
    /// are applied last when `with_env` is set.
    pub fn load_from(
        global: Option<&Path>,
        local: Option<&Path>,
        with_env: bool,
    ) -> Result<Self, ApplicationError> {
        let defaults = toml::to_string(&Settings::default()).map_err(|e| {
            ApplicationError::Config {
                message: format!("serialize defaults: {e}"),
            }
        })?;

        let mut builder =
            Config::builder().add_source(File::from_str(&defaults, FileFormat::Toml));

        for path in [global, local].into_iter().flatten() {
            builder = builder.add_source(File::from(path).required(true));
        }

        if with_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        // Expand ~ and $VAR in path-like fields
        settings.expand_paths();

        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.output.dir.to_string_lossy().as_ref());
        self.output.dir = PathBuf::from(expanded);
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# techtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/techtree/techtree.toml
#   Local:  <project_dir>/techtree.toml
#   Env:    TECHTREE_* environment variables, e.g. TECHTREE_OUTPUT__FORMAT=svg
#
# Sources accept a URL (http/https), a file path, or inline TSV text.
# Prefix with url:, file: or inline: to skip the guessing.

# tech_tree = "https://docs.google.com/spreadsheets/d/e/.../pub?output=tsv&gid=1681045610"
# parts = "data/parts.tsv"

[output]
# dir = "."
# name = "tech_tree"
# format = "png"

[graphviz]
# command = "dot"

[fetch]
# timeout_secs = 30

[style]
# rankdir = "TB"
# ranksep = 1.0
# nodesep = 0.5
# font = "Arial"
# node_fill = "lightblue"
# edge_color = "darkblue"
# arrow_size = 0.8
# cluster_fill = "lightyellow"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
