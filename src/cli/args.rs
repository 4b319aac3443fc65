//! CLI argument definitions using clap.
//!
//! Without a subcommand, goprintenv analyzes the project at `--path` and prints
//! one `NAME=default` line per environment variable.
//!
//! ## Commands
//!
//! - `init`: write a default `.goprintenv.json` into the project

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub print: PrintArgs,
}

impl Arguments {
    /// Get the verbose flag (only the print mode has one).
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Init(_)) => false,
            None => self.print.verbose,
        }
    }
}

/// Arguments of the default print mode.
#[derive(Debug, Clone, Args)]
pub struct PrintArgs {
    /// Go project path (directory containing go.mod)
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Report skipped fields and a scan summary on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Go module cache root
    #[arg(long, env = "GOMODCACHE", hide_env_values = true)]
    pub gomodcache: Option<PathBuf>,

    /// GOPATH list; the module cache defaults to <first entry>/pkg/mod
    #[arg(long, env = "GOPATH", hide_env_values = true)]
    pub gopath: Option<String>,
}

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Directory to write the configuration file into
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize a new .goprintenv.json configuration file
    Init(InitCommand),
}
