//! Dispatch of parsed arguments to the analysis or to `init`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::args::{Arguments, Command, PrintArgs};
use crate::{
    config::{CONFIG_FILE_NAME, default_config_json, load_config},
    core::{Analysis, AnalysisContext, resolve::module_cache_root},
};

/// Result of running a goprintenv command.
pub enum CommandResult {
    Print(PrintResult),
    Init { config_path: PathBuf },
}

pub struct PrintResult {
    pub analysis: Analysis,
    /// True if a `.goprintenv.json` was found, false if defaults were used.
    pub config_from_file: bool,
    pub module_cache: Option<PathBuf>,
}

pub fn run(Arguments { command, print }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Init(cmd)) => {
            let config_path = init(&cmd.path)?;
            Ok(CommandResult::Init { config_path })
        }
        None => print_env(&print).map(CommandResult::Print),
    }
}

fn print_env(args: &PrintArgs) -> Result<PrintResult> {
    let config_result = load_config(&args.path)?;
    let module_cache = module_cache_root(args.gomodcache.as_deref(), args.gopath.as_deref());

    let ctx = AnalysisContext::new(&args.path, config_result.config, module_cache.clone());
    let analysis = ctx
        .analyze()
        .with_context(|| format!("Failed to analyze {}", args.path.display()))?;

    Ok(PrintResult {
        analysis,
        config_from_file: config_result.from_file,
        module_cache,
    })
}

fn init(dir: &Path) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!("{} already exists", CONFIG_FILE_NAME);
    }

    fs::write(&config_path, default_config_json()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(config_path)
}
