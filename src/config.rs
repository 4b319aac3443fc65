use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".goprintenv.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Struct tag key that marks environment-sourced fields.
    #[serde(default = "default_tag_key")]
    pub tag_key: String,
    /// Flag marking a field as a nested record flattened under a prefix.
    #[serde(default = "default_prefix_flag")]
    pub prefix_flag: String,
    /// Flag carrying the default value.
    #[serde(default = "default_default_flag")]
    pub default_flag: String,
    /// Directory holding vendored dependencies, relative to the project root.
    #[serde(default = "default_vendor_dir")]
    pub vendor_dir: String,
    /// Glob patterns (relative to the project root) skipped during the walk.
    #[serde(default)]
    pub ignores: Vec<String>,
}

fn default_tag_key() -> String {
    "env".to_string()
}

fn default_prefix_flag() -> String {
    "prefix".to_string()
}

fn default_default_flag() -> String {
    "default".to_string()
}

fn default_vendor_dir() -> String {
    "vendor".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tag_key: default_tag_key(),
            prefix_flag: default_prefix_flag(),
            default_flag: default_default_flag(),
            vendor_dir: default_vendor_dir(),
            ignores: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if a tag or flag name is empty or an `ignores` glob is invalid.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("tagKey", &self.tag_key),
            ("prefixFlag", &self.prefix_flag),
            ("defaultFlag", &self.default_flag),
            ("vendorDir", &self.vendor_dir),
        ] {
            anyhow::ensure!(!value.is_empty(), "'{}' must not be empty", name);
        }

        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        Ok(())
    }

    /// Compiled `ignores` patterns. Call after [`Config::validate`]; invalid
    /// patterns are dropped.
    pub fn ignore_patterns(&self) -> Vec<Pattern> {
        self.ignores
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect()
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
