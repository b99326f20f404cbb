//! Command-line interface layer.

use anyhow::Result;

mod args;
mod commands;
mod exit_status;
mod report;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

use commands::{
    CommandResult, build::build, import::import, init::init, keys::keys,
};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose();

    let Some(Arguments {
        command: Some(command),
    }) = args.with_command_or_help()
    else {
        return Ok(ExitStatus::Success);
    };

    let result = match command {
        Command::Build(cmd) => build(cmd)?,
        Command::Keys(cmd) => keys(cmd)?,
        Command::Import(cmd) => import(cmd)?,
        Command::Init => init()?,
    };
    report::print(&result, verbose);

    Ok(exit_status_from_result(&result))
}

fn exit_status_from_result(result: &CommandResult) -> ExitStatus {
    if result.exit_on_errors && !result.errors.is_empty() {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    }
}
