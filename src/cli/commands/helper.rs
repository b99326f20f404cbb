use std::env;

use anyhow::{Context, Result};
use colored::Colorize;

use super::super::args::CommonArgs;
use super::{CommandError, CommandResult, CommandSummary};
use crate::config::{CONFIG_FILE_NAME, Config, ConfigLoadResult, load_config};
use crate::core::Diagnostics;
use crate::loader::Project;

/// Load the configuration, apply command-line overrides, and load the
/// project graph.
pub fn load_project(
    common: &CommonArgs,
    diag: &mut Diagnostics,
    overrides: impl FnOnce(&mut Config),
) -> Result<Project> {
    let root = match &common.root {
        Some(root) => root.clone(),
        None => env::current_dir().context("Failed to get current directory")?,
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("Project root does not exist: {}", root.display()))?;

    let ConfigLoadResult {
        mut config,
        from_file,
    } = load_config(&root)?;
    if !from_file && common.verbose {
        eprintln!(
            "{} No {} found, using defaults",
            "note:".bold().cyan(),
            CONFIG_FILE_NAME
        );
    }
    overrides(&mut config);
    config.validate()?;

    let project = Project::load(&root, config, common.verbose, diag)?;
    if project.skipped_count > 0 && common.verbose {
        eprintln!(
            "{} {} path(s) could not be read while scanning",
            "warning:".bold().yellow(),
            project.skipped_count
        );
    }
    Ok(project)
}

pub fn finish(
    summary: CommandSummary,
    diagnostics: Diagnostics,
    errors: Vec<CommandError>,
    exit_on_errors: bool,
) -> CommandResult {
    CommandResult {
        summary,
        diagnostics,
        errors,
        exit_on_errors,
    }
}
