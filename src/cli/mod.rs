use anyhow::Result;

pub use args::{Arguments, Command, InitCommand, PrintArgs};
pub use exit_status::ExitStatus;

mod args;
mod exit_status;
mod report;
mod run;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose();

    let result = run::run(args)?;
    report::print(&result, verbose)?;

    Ok(ExitStatus::Success)
}
