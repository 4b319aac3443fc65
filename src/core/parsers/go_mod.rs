//! `go.mod` reader. Only the `module` directive is of interest.

use std::{fs, io, path::Path, sync::LazyLock};

use regex::Regex;

use crate::core::error::{AnalysisError, Result};

pub const MANIFEST_FILE_NAME: &str = "go.mod";

static MODULE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*module\s+(?:"([^"]+)"|`([^`]+)`|([^\s/]\S*))"#)
        .expect("module directive pattern is valid")
});

/// Read the module path declared by `<project_root>/go.mod`.
pub fn read_module_path(project_root: &Path) -> Result<String> {
    let path = project_root.join(MANIFEST_FILE_NAME);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(AnalysisError::ManifestNotFound {
                root: project_root.to_path_buf(),
            });
        }
        Err(err) => return Err(AnalysisError::io(path, err)),
    };

    parse_module_path(&content).ok_or(AnalysisError::ModuleDirectiveMissing { path })
}

/// Extract the module path from `go.mod` content.
pub fn parse_module_path(content: &str) -> Option<String> {
    let stripped: String = content
        .lines()
        .map(|line| match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n");

    let captures = MODULE_DIRECTIVE.captures(&stripped)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .or_else(|| captures.get(3))
        .map(|m| m.as_str().to_string())
}
