//! Output of command results.
//!
//! Entries go to stdout; in verbose mode skipped subtrees and a scan summary
//! go to stderr. Kept separate from the core so goprintenv works as a library.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;

use super::run::{CommandResult, PrintResult};
use crate::core::{Diagnostic, render_entries};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

pub fn print(result: &CommandResult, verbose: bool) -> Result<()> {
    match result {
        CommandResult::Print(print) => {
            io::stdout().lock().write_all(render_entries(&print.analysis.entries).as_bytes())?;
            if verbose {
                print_verbose_to(print, &mut io::stderr().lock())?;
            }
        }
        CommandResult::Init { config_path } => {
            println!("{} Created {}", SUCCESS_MARK.green(), config_path.display());
        }
    }
    Ok(())
}

/// Diagnostics and summary, as shown with `--verbose`.
pub fn print_verbose_to<W: Write>(result: &PrintResult, writer: &mut W) -> io::Result<()> {
    if !result.config_from_file {
        writeln!(writer, "Note: No .goprintenv.json found, using default configuration")?;
    }
    if result.module_cache.is_none() {
        writeln!(writer, "Note: no module cache found (set GOMODCACHE or GOPATH)")?;
    }

    for diagnostic in &result.analysis.diagnostics {
        print_diagnostic(diagnostic, writer)?;
    }

    let analysis = &result.analysis;
    writeln!(
        writer,
        "{} {}: {} variable(s) from {} root(s), {} file(s) scanned, {} dependency dir(s) read",
        SUCCESS_MARK.green(),
        analysis.module_path.bold(),
        analysis.entries.len(),
        analysis.root_count,
        analysis.files_scanned,
        analysis.dependency_dirs_scanned,
    )
}

fn print_diagnostic<W: Write>(diagnostic: &Diagnostic, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{} {}", "warning:".bold().yellow(), diagnostic)
}
