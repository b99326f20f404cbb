use anyhow::{Result, bail};

use super::super::args::BuildCommand;
use super::helper::{finish, load_project};
use super::{BuildSummary, CommandError, CommandResult, CommandSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::core::{Diagnostics, clone_for_each_locale};
use crate::writer::{WriteMode, write_graph};

pub fn build(cmd: BuildCommand) -> Result<CommandResult> {
    let mut diag = Diagnostics::new();
    let BuildCommand {
        common,
        locales,
        out,
    } = cmd;

    let mut project = load_project(&common, &mut diag, |config| {
        if !locales.is_empty() {
            config.locales = locales;
        }
        if let Some(out) = out {
            config.output_dir = out.to_string_lossy().into_owned();
        }
    })?;

    if project.config.locales.is_empty() {
        bail!(
            "No locales to build: pass --locale or set 'locales' in {}",
            CONFIG_FILE_NAME
        );
    }

    let options = project.options();
    let documents = project.documents.clone();
    let report = clone_for_each_locale(
        &mut project.graph,
        &documents,
        &project.config.locales,
        &options,
        &mut diag,
    );

    let output_dir = project.output_dir();
    let written = write_graph(&project.graph, &output_dir, &options.names, WriteMode::All)?;

    let errors = report
        .failures()
        .map(|(identifier, err)| CommandError {
            asset: Some(identifier.to_string()),
            message: err.to_string(),
        })
        .collect();

    Ok(finish(
        CommandSummary::Build(BuildSummary {
            locales: project.config.locales.clone(),
            document_count: documents.len(),
            localized: report.localized().map(|d| d.identifier.clone()).collect(),
            written_count: written.written.len(),
            output_dir,
        }),
        diag,
        errors,
        true,
    ))
}
