use std::process::ExitCode;

/// Exit status of the CLI.
///
/// - `Success` (0): every document was processed (warnings allowed)
/// - `Failure` (1): the command ran but some documents failed
/// - `Error` (2): the command could not run (config, I/O, fatal import error)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
