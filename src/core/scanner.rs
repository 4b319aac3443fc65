//! Source scanner: turns Go files into [`SourceUnit`]s.
//!
//! The parser reports raw facts; this module assigns each file its package
//! identity and wraps the retained structs as shared [`RecordType`]s.

use std::{
    fs,
    path::{Component, Path},
    rc::Rc,
};

use glob::Pattern;

use crate::core::{
    data::{Import, RecordType, SourceUnit},
    error::{AnalysisError, Result},
    file_scanner::{collect_source_files, list_source_files},
    parsers::go::parse_go_source,
};

/// How a scanned file gets its package identity.
#[derive(Debug, Clone, Copy)]
pub enum PackageScope<'a> {
    /// A file of the analysed project: identity derives from the module path and
    /// the file's directory relative to the project root.
    Project { root: &'a Path, module_path: &'a str },
    /// Every file gets the same identity (dependency packages, rescans of a
    /// known package directory).
    Fixed(&'a str),
}

impl PackageScope<'_> {
    fn identity(&self, file_path: &Path, package_name: &str) -> String {
        match self {
            Self::Fixed(identity) => (*identity).to_string(),
            Self::Project { .. } if package_name == "main" => self.module_path().to_string(),
            Self::Project { root, module_path } => {
                let dir = file_path.parent().unwrap_or(file_path);
                let relative = dir.strip_prefix(root).unwrap_or(dir);
                join_import_path(module_path, relative)
            }
        }
    }

    fn module_path(&self) -> &str {
        match self {
            Self::Project { module_path, .. } => module_path,
            Self::Fixed(identity) => identity,
        }
    }
}

/// `module_path` followed by the normal components of `relative`, slash separated.
pub fn join_import_path(module_path: &str, relative: &Path) -> String {
    let mut identity = module_path.trim_end_matches('/').to_string();
    for component in relative.components() {
        if let Component::Normal(segment) = component {
            identity.push('/');
            identity.push_str(&segment.to_string_lossy());
        }
    }
    identity
}

/// Scan a single Go file.
pub fn scan_file(path: &Path, scope: PackageScope) -> Result<SourceUnit> {
    let code = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    let parsed = parse_go_source(&code, path)?;

    let package = scope.identity(path, &parsed.package_name);
    let imports: Rc<[Import]> = parsed.imports.into();
    let records = parsed
        .records
        .into_iter()
        .map(|record| {
            Rc::new(RecordType {
                file_path: path.to_path_buf(),
                package: package.clone(),
                name: record.name,
                fields: record.fields,
                imports: Rc::clone(&imports),
            })
        })
        .collect();

    Ok(SourceUnit {
        file_path: path.to_path_buf(),
        package,
        imports,
        records,
    })
}

/// Scan every Go file directly inside `dir`.
pub fn scan_directory(dir: &Path, scope: PackageScope) -> Result<Vec<SourceUnit>> {
    list_source_files(dir)?
        .iter()
        .map(|path| scan_file(path, scope))
        .collect()
}

/// Walk the project tree and scan every Go file. The first parse error aborts the walk.
pub fn scan_project(
    root: &Path,
    module_path: &str,
    vendor_dir: &str,
    ignore_patterns: &[Pattern],
) -> Result<Vec<SourceUnit>> {
    let scope = PackageScope::Project { root, module_path };
    collect_source_files(root, vendor_dir, ignore_patterns)?
        .iter()
        .map(|path| scan_file(path, scope))
        .collect()
}
