//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `build`: Clone every document per locale and write the localized graph
//! - `keys`: List the translation keys reachable from each document
//! - `import`: Merge a translation file into the owning resources
//! - `init`: Initialize the configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Build(cmd)) => cmd.common.verbose,
            Some(Command::Keys(cmd)) => cmd.common.verbose,
            Some(Command::Import(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all project commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root directory (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Print every warning instead of a count
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct BuildCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Locale to build (overrides config file, can be repeated)
    #[arg(short, long = "locale", value_name = "LOCALE")]
    pub locales: Vec<String>,

    /// Output directory, relative to the root (overrides config file)
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct KeysCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Resolve the values of this locale
    #[arg(short, long)]
    pub locale: Option<String>,
}

#[derive(Debug, Args)]
pub struct ImportCommand {
    /// JSON file mapping key -> locale -> value
    pub file: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually write the resources (default is dry-run)
    #[arg(long)]
    pub apply: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write one localized copy of every document per locale
    Build(BuildCommand),
    /// List translation keys reachable from each document
    Keys(KeysCommand),
    /// Merge translations into the resources that own their keys
    Import(ImportCommand),
    /// Initialize a new .localerc.json configuration file
    Init,
}
