use anyhow::Result;

use super::super::args::ImportCommand;
use super::helper::{finish, load_project};
use super::{CommandResult, CommandSummary, ImportCommandSummary};
use crate::core::parsers::resource::load_translation_file;
use crate::core::{Diagnostics, import_translations};
use crate::writer::{WriteMode, write_graph};

pub fn import(cmd: ImportCommand) -> Result<CommandResult> {
    let table = load_translation_file(&cmd.file)?;

    let mut diag = Diagnostics::new();
    let mut project = load_project(&cmd.common, &mut diag, |_| {})?;
    let options = project.options();

    let summary = import_translations(&mut project.graph, &table, &options, &mut diag)?;

    let written = if cmd.apply {
        write_graph(&project.graph, &project.root, &options.names, WriteMode::Dirty)?.written
    } else {
        Vec::new()
    };

    Ok(finish(
        CommandSummary::Import(ImportCommandSummary {
            import: summary,
            is_apply: cmd.apply,
            written,
        }),
        diag,
        Vec::new(),
        false,
    ))
}
