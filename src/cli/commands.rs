//! Command dispatch and handlers

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use itertools::Itertools;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::OutputSpec;
use crate::cli::args::{Cli, Commands, ConfigCommands, RenderArgs, SourceArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Assignment, GraphModel};
use crate::infrastructure::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = cli
        .project_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    match &cli.command {
        None => cmd_render(&project_dir, &RenderArgs::default()),
        Some(Commands::Render(args)) => cmd_render(&project_dir, args),
        Some(Commands::Tree(args)) => cmd_tree(&project_dir, args),
        Some(Commands::Check(args)) => cmd_check(&project_dir, args),
        Some(Commands::Config { command }) => cmd_config(&project_dir, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Relative output directories are taken relative to the project directory.
fn resolve_dir(project_dir: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        project_dir.join(dir)
    }
}

fn validate_output_name(name: &str) -> CliResult<()> {
    if name.is_empty() || name.contains(['/', '\\']) {
        return Err(CliError::InvalidArgs(format!(
            "output name must be a plain file name: '{name}'"
        )));
    }
    Ok(())
}

/// Relative source paths are taken relative to the project directory.
fn load_assignment(container: &ServiceContainer, project_dir: &Path) -> CliResult<Assignment> {
    let service = container.tech_tree_service();
    let tech_tree = service.probe(&container.settings.tech_tree, project_dir);
    let parts = service.probe(&container.settings.parts, project_dir);

    output::action("Tech tree", &tech_tree);
    output::action("Parts catalog", &parts);
    Ok(service.assemble(&tech_tree, &parts)?)
}

#[instrument(skip(args))]
fn cmd_render(project_dir: &Path, args: &RenderArgs) -> CliResult<()> {
    let mut settings = Settings::load(Some(project_dir))?;
    args.apply(&mut settings);
    validate_output_name(&settings.output.name)?;
    if settings.output.format.trim().is_empty() {
        return Err(CliError::InvalidArgs("output format is empty".into()));
    }
    debug!("cmd_render: settings={:?}", settings);

    let container = ServiceContainer::new(settings);
    let assignment = load_assignment(&container, project_dir)?;
    output::info(&format!(
        "Found {} tech nodes and {} parts",
        assignment.tree.len(),
        assignment.part_count
    ));
    output::info(&format!("{} parts are unassigned", assignment.unassigned.len()));

    let settings = &container.settings;
    let model = GraphModel::build(&assignment.tree, &assignment.unassigned, &settings.style);
    let spec = OutputSpec {
        dir: resolve_dir(project_dir, &settings.output.dir),
        name: settings.output.name.clone(),
        format: settings.output.format.clone(),
        source_only: args.source_only,
    };

    let rendered = container.render_service().render(&model, &spec)?;
    if let Some(image) = &rendered.image_path {
        output::success(&format!("Graph saved as {}", image.display()));
    }
    output::success(&format!(
        "Graph source saved as {}",
        rendered.source_path.display()
    ));
    Ok(())
}

#[instrument(skip(args))]
fn cmd_tree(project_dir: &Path, args: &SourceArgs) -> CliResult<()> {
    let mut settings = Settings::load(Some(project_dir))?;
    args.apply(&mut settings);

    let container = ServiceContainer::new(settings);
    let assignment = load_assignment(&container, project_dir)?;
    output::info(&tree_view(&assignment));
    Ok(())
}

#[instrument(skip(args))]
fn cmd_check(project_dir: &Path, args: &SourceArgs) -> CliResult<()> {
    let mut settings = Settings::load(Some(project_dir))?;
    args.apply(&mut settings);

    let container = ServiceContainer::new(settings);
    let assignment = load_assignment(&container, project_dir)?;

    output::header("Summary");
    output::detail(&format!("tech nodes:       {}", assignment.tree.len()));
    output::detail(&format!("parts:            {}", assignment.part_count));
    output::detail(&format!(
        "assigned parts:   {}",
        assignment.tree.assigned_part_count()
    ));
    output::detail(&format!("unassigned parts: {}", assignment.unassigned.len()));

    let dangling = assignment.tree.dangling_prerequisites();
    for (node, missing) in &dangling {
        output::warning(&format!(
            "'{node}' lists unknown prerequisite '{missing}' (no edge drawn)"
        ));
    }
    for part in &assignment.unassigned {
        if let Some(node) = &part.tech_node {
            output::warning(&format!(
                "part '{}' references unknown tech node '{}'",
                part.name, node
            ));
        }
    }

    if dangling.is_empty() {
        output::success("all prerequisites resolve");
    }
    Ok(())
}

fn cmd_config(project_dir: &Path, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let describe = |path: &Path| {
                let state = if path.exists() { "exists" } else { "not found" };
                format!("{} ({state})", path.display())
            };
            match global_config_path() {
                Some(path) => output::action("global", &describe(&path)),
                None => output::action("global", "unavailable (no home directory)"),
            }
            output::action("local", &describe(&local_config_path(project_dir)));
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

/// Text tree of the joined data: tiers, their nodes and parts, then the
/// unassigned parts by category.
pub fn tree_view(assignment: &Assignment) -> Tree<String> {
    let mut root = Tree::new("Tech Tree".to_string());

    let by_tier = assignment
        .tree
        .iter()
        .sorted_by_key(|n| n.tier)
        .chunk_by(|n| n.tier);
    for (tier, nodes) in &by_tier {
        let mut tier_tree = Tree::new(format!("Tier {tier}"));
        for node in nodes {
            let label = if node.prerequisites.is_empty() {
                node.name.clone()
            } else {
                format!("{} <- {}", node.name, node.prerequisites.join(", "))
            };
            let parts = node.parts.iter().map(|p| p.to_string());
            tier_tree.push(Tree::new(label).with_leaves(parts));
        }
        root.push(tier_tree);
    }

    if !assignment.unassigned.is_empty() {
        let mut unassigned = Tree::new("Unassigned Parts".to_string());
        let by_category = assignment
            .unassigned
            .iter()
            .into_group_map_by(|p| p.category.as_str());
        for category in by_category.keys().sorted() {
            let parts = &by_category[category];
            unassigned.push(
                Tree::new(category.to_string()).with_leaves(parts.iter().map(|p| p.to_string())),
            );
        }
        root.push(unassigned);
    }

    root
}
