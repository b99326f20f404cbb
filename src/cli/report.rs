//! Report formatting and printing utilities.
//!
//! Command results are printed cargo-style: errors and warnings first, then
//! a per-command summary. Kept apart from the core so that the engine can be
//! used as a library without any terminal output.

use std::io::{self, Write};

use colored::Colorize;
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    BuildSummary, CommandError, CommandResult, CommandSummary, ImportCommandSummary, InitSummary,
    KeysSummary,
};
use crate::config::CONFIG_FILE_NAME;
use crate::core::{Diagnostic, Diagnostics};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Longest value shown in `keys` output before it is shortened.
const MAX_VALUE_DISPLAY: usize = 60;

pub fn print(result: &CommandResult, verbose: bool) {
    let mut stdout = io::stdout().lock();
    print_errors_to(&result.errors, &mut stdout);
    print_diagnostics_to(&result.diagnostics, verbose, &mut stdout);
    print_command_output(result, &mut stdout);
    print_summary_to(result.errors.len(), result.diagnostics.len(), &mut stdout);
}

fn print_command_output<W: Write>(result: &CommandResult, writer: &mut W) {
    match &result.summary {
        CommandSummary::Build(summary) => print_build(summary, writer),
        CommandSummary::Keys(summary) => print_keys(summary, writer),
        CommandSummary::Import(summary) => print_import(summary, writer),
        CommandSummary::Init(summary) => print_init(summary, writer),
    }
}

pub fn print_errors_to<W: Write>(errors: &[CommandError], writer: &mut W) {
    for error in errors {
        let _ = writeln!(writer, "{}: {}", "error".bold().red(), error.message);
        if let Some(asset) = &error.asset {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), asset);
        }
    }
}

/// Print every warning when `verbose`, otherwise a single count line.
pub fn print_diagnostics_to<W: Write>(diagnostics: &Diagnostics, verbose: bool, writer: &mut W) {
    if diagnostics.is_empty() {
        return;
    }
    if !verbose {
        let _ = writeln!(
            writer,
            "{} {} warning(s) (use {} for details)",
            "warning:".bold().yellow(),
            diagnostics.len(),
            "-v".cyan()
        );
        return;
    }

    let mut sorted: Vec<&Diagnostic> = diagnostics.iter().collect();
    sorted.sort_by(|a, b| a.asset.cmp(&b.asset).then(a.kind.cmp(&b.kind)));
    for diagnostic in sorted {
        let _ = writeln!(
            writer,
            "{}: {}  {}",
            "warning".bold().yellow(),
            diagnostic.message,
            diagnostic.kind.to_string().dimmed().cyan()
        );
        if let Some(asset) = &diagnostic.asset {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), asset);
        }
    }
}

pub fn print_summary_to<W: Write>(errors: usize, warnings: usize, writer: &mut W) {
    let total = errors + warnings;
    if total == 0 {
        return;
    }
    let _ = writeln!(
        writer,
        "\n{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        total,
        errors,
        if errors == 1 { "error" } else { "errors" }.red(),
        warnings,
        if warnings == 1 { "warning" } else { "warnings" }.yellow()
    );
}

fn print_build<W: Write>(summary: &BuildSummary, writer: &mut W) {
    if summary.document_count == 0 {
        let _ = writeln!(
            writer,
            "{} No documents matched the 'documents' patterns",
            "note:".bold().cyan()
        );
        return;
    }

    for identifier in &summary.localized {
        let _ = writeln!(writer, "  {} {}", "Localized".green().bold(), identifier);
    }
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Built {} document(s) into {} locale(s) [{}], wrote {} file(s) to {}",
            summary.localized.len(),
            summary.locales.len(),
            summary.locales.join(", "),
            summary.written_count,
            summary.output_dir.display()
        )
        .green()
    );
}

fn print_keys<W: Write>(summary: &KeysSummary, writer: &mut W) {
    for document in &summary.documents {
        let _ = writeln!(
            writer,
            "{} ({} key(s))",
            document.identifier.bold(),
            document.keys.len()
        );

        let width = document
            .keys
            .iter()
            .map(|k| UnicodeWidthStr::width(k.key.as_str()))
            .max()
            .unwrap_or(0);
        for entry in &document.keys {
            let padding = width - UnicodeWidthStr::width(entry.key.as_str());
            let detail = match (&summary.locale, &entry.value) {
                (Some(_), Some(value)) => display_value(value),
                (Some(_), None) => "(missing)".red().to_string(),
                (None, _) if entry.locales.is_empty() => "(missing)".red().to_string(),
                (None, _) => entry.locales.join(", ").dimmed().to_string(),
            };
            let unused = if entry.used {
                String::new()
            } else {
                format!("  {}", "(unused)".yellow())
            };
            let _ = writeln!(
                writer,
                "  {}{:padding$}  {}{}",
                entry.key,
                "",
                detail,
                unused,
                padding = padding
            );
        }
    }
}

/// A value as JSON, shortened to fit one line.
fn display_value(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= MAX_VALUE_DISPLAY {
        return text;
    }
    let mut shortened: String = text.chars().take(MAX_VALUE_DISPLAY - 3).collect();
    shortened.push_str("...");
    shortened
}

fn print_import<W: Write>(summary: &ImportCommandSummary, writer: &mut W) {
    let import = &summary.import;
    if import.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("All {} key(s) are already up to date", import.keys).green()
        );
        return;
    }

    let verb = if summary.is_apply {
        "Updated".green().bold()
    } else {
        "Would update".yellow().bold()
    };
    let _ = writeln!(
        writer,
        "{} {} value(s) in {} resource(s):",
        verb,
        import.values_changed,
        import.updated_resources.len()
    );
    for resource in &import.updated_resources {
        let created = if import.created_resources.contains(resource) {
            " (new)"
        } else {
            ""
        };
        let _ = writeln!(writer, "  - {}{}", resource, created);
    }

    if summary.is_apply {
        let _ = writeln!(writer, "Wrote {} file(s).", summary.written.len());
    } else {
        let _ = writeln!(writer, "Run with {} to write these changes.", "--apply".cyan());
    }
}

fn print_init<W: Write>(summary: &InitSummary, writer: &mut W) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

// ============================================================
// Tests
// ============================================================
