use std::process::ExitCode;

/// Exit status of the CLI.
///
/// - `Success` (0): entries were printed (possibly none)
/// - `Error` (2): the run was aborted (parse error, missing go.mod, config error, etc.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Analysis completed.
    Success,
    /// Analysis aborted by a fatal error.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
