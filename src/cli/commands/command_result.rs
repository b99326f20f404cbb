use std::path::PathBuf;

use serde_json::Value;

use crate::core::{Diagnostics, ImportSummary};

#[derive(Debug)]
pub enum CommandSummary {
    Build(BuildSummary),
    Keys(KeysSummary),
    Import(ImportCommandSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct BuildSummary {
    pub locales: Vec<String>,
    /// Documents found by the scan.
    pub document_count: usize,
    /// Identifiers of the localized documents that were produced.
    pub localized: Vec<String>,
    pub written_count: usize,
    pub output_dir: PathBuf,
}

#[derive(Debug)]
pub struct KeysSummary {
    pub locale: Option<String>,
    pub documents: Vec<DocumentKeys>,
}

#[derive(Debug)]
pub struct DocumentKeys {
    pub identifier: String,
    pub keys: Vec<KeyEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyEntry {
    pub key: String,
    /// Called from a script reachable from the document.
    pub used: bool,
    /// Locales the reachable resources define the key for.
    pub locales: Vec<String>,
    /// Resolved value, when a locale was requested.
    pub value: Option<Value>,
}

#[derive(Debug)]
pub struct ImportCommandSummary {
    pub import: ImportSummary,
    pub is_apply: bool,
    /// Files written back to the project.
    pub written: Vec<String>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// A fatal problem scoped to one asset (or the whole command).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    pub asset: Option<String>,
    pub message: String,
}

/// Result of running a command.
pub struct CommandResult {
    pub summary: CommandSummary,
    pub diagnostics: Diagnostics,
    pub errors: Vec<CommandError>,
    /// If true, exit code 1 should be returned when there are errors.
    pub exit_on_errors: bool,
}
