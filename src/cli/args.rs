//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::config::Settings;

/// Render a game tech tree and its parts catalog as a Graphviz diagram
#[derive(Parser, Debug)]
#[command(name = "techtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Project directory: local techtree.toml and relative output dir (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the diagram (default)
    Render(RenderArgs),

    /// Print the tech tree by tier
    Tree(SourceArgs),

    /// Report counts, unassigned parts and dangling prerequisites
    Check(SourceArgs),

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Table sources: URL, file path or inline TSV (prefix url:, file:, inline: to force)
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Tech tree table (columns: Node, Tier, Description, Prerequisites)
    #[arg(long, value_name = "SOURCE")]
    pub tech_tree: Option<String>,

    /// Parts catalog table (columns: Category, Name, Tech Node, Size)
    #[arg(long, value_name = "SOURCE")]
    pub parts: Option<String>,
}

#[derive(Args, Debug, Default, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Base name of the output files
    #[arg(short, long, value_name = "NAME")]
    pub output: Option<String>,

    /// Directory for the output files
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub output_dir: Option<PathBuf>,

    /// Image format passed to Graphviz (png, svg, pdf, ...)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Only write the DOT source, do not run Graphviz
    #[arg(long)]
    pub source_only: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Print a commented config template
    Template,
}

impl SourceArgs {
    /// Override configured sources with the ones given on the command line.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(src) = &self.tech_tree {
            settings.tech_tree = src.clone();
        }
        if let Some(src) = &self.parts {
            settings.parts = src.clone();
        }
    }
}

impl RenderArgs {
    /// Override configured sources and output settings.
    pub fn apply(&self, settings: &mut Settings) {
        self.sources.apply(settings);
        if let Some(name) = &self.output {
            settings.output.name = name.clone();
        }
        if let Some(dir) = &self.output_dir {
            settings.output.dir = dir.clone();
        }
        if let Some(format) = &self.format {
            settings.output.format = format.clone();
        }
    }
}
