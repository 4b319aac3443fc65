//! Dependency resolution for qualified field types (`alias.Type`).
//!
//! Packages are located and scanned lazily: a directory is read only when a
//! prefix-container field actually points into it, and each directory is
//! scanned at most once per run.
//!
//! Location order for an import path `p`:
//! 1. the reference graph (packages of the analysed project)
//! 2. the project directory, when `p` lies under the module path
//! 3. `<project>/vendor/p`
//! 4. the module cache, segment by segment, following `name@version`
//!    directories and falling back to the deepest existing parent

use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::core::{
    data::{Import, RecordType},
    error::{AnalysisError, Result},
    graph::ReferenceGraph,
    scanner::{PackageScope, scan_directory},
};

/// Immutable environment of one analysis run.
#[derive(Debug, Clone)]
pub struct ResolverContext {
    pub project_root: PathBuf,
    pub module_path: String,
    /// Vendored dependencies; may not exist.
    pub vendor_dir: PathBuf,
    /// Root of the module cache (`$GOMODCACHE` or `$GOPATH/pkg/mod`), if any.
    pub module_cache: Option<PathBuf>,
}

/// Pick the module cache root from `GOMODCACHE`, else the first `GOPATH`
/// entry joined with `pkg/mod`. Returns `None` if the result does not exist.
pub fn module_cache_root(gomodcache: Option<&Path>, gopath: Option<&str>) -> Option<PathBuf> {
    let candidate = match (gomodcache, gopath) {
        (Some(cache), _) if !cache.as_os_str().is_empty() => cache.to_path_buf(),
        (_, Some(gopath)) => env::split_paths(gopath)
            .find(|p| !p.as_os_str().is_empty())?
            .join("pkg")
            .join("mod"),
        _ => return None,
    };
    candidate.is_dir().then_some(candidate)
}

/// Escape an import path the way the module cache stores it on disk:
/// every uppercase letter becomes `!` followed by its lowercase form.
pub fn escape_module_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            escaped.push('!');
            escaped.push(c.to_ascii_lowercase());
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Find the import an alias refers to.
///
/// Preference: explicit alias, then last path segment, then the first import
/// whose path contains the alias.
pub fn match_import<'a>(alias: &str, imports: &'a [Import]) -> Option<&'a Import> {
    imports
        .iter()
        .find(|i| i.alias.as_deref() == Some(alias))
        .or_else(|| {
            imports
                .iter()
                .find(|i| i.alias.is_none() && i.last_segment() == alias)
        })
        .or_else(|| imports.iter().find(|i| i.path.contains(alias)))
}

/// Outcome of resolving a qualified reference.
#[derive(Debug)]
pub enum Resolution {
    Found(Rc<RecordType>),
    /// No import matched the alias.
    ImportNotMatched,
    /// The import matched but the package or the type was not found.
    NotFound { import_path: String },
}

pub struct DependencyResolver {
    ctx: ResolverContext,
    /// Records per scanned directory.
    scanned: HashMap<PathBuf, Vec<Rc<RecordType>>>,
}

impl DependencyResolver {
    pub fn new(ctx: ResolverContext) -> Self {
        Self {
            ctx,
            scanned: HashMap::new(),
        }
    }

    /// Number of directories scanned so far.
    pub fn scanned_dirs(&self) -> usize {
        self.scanned.len()
    }

    pub fn resolve(
        &mut self,
        alias: &str,
        type_name: &str,
        imports: &[Import],
        graph: &ReferenceGraph,
    ) -> Result<Resolution> {
        let Some(import) = match_import(alias, imports) else {
            return Ok(Resolution::ImportNotMatched);
        };
        let import_path = import.path.as_str();

        if let Some(record) = graph.get(import_path, type_name) {
            return Ok(Resolution::Found(Rc::clone(record)));
        }

        let not_found = || {
            Ok(Resolution::NotFound {
                import_path: import_path.to_string(),
            })
        };

        let Some(dir) = self.locate_package(import_path)? else {
            return not_found();
        };

        let found = self
            .scan_package_dir(&dir, import_path)?
            .iter()
            .find(|record| record.name == type_name)
            .cloned();

        match found {
            Some(record) => Ok(Resolution::Found(record)),
            None => not_found(),
        }
    }

    /// Scan (once) every Go file directly inside `dir` under a fixed package identity.
    ///
    /// Within a directory the first declaration of a name wins.
    pub fn scan_package_dir(&mut self, dir: &Path, package: &str) -> Result<&[Rc<RecordType>]> {
        if !self.scanned.contains_key(dir) {
            let units = scan_directory(dir, PackageScope::Fixed(package))?;
            let mut records: Vec<Rc<RecordType>> = Vec::new();
            for record in units.into_iter().flat_map(|unit| unit.records) {
                if !records.iter().any(|r| r.name == record.name) {
                    records.push(record);
                }
            }
            self.scanned.insert(dir.to_path_buf(), records);
        }

        Ok(self.scanned.get(dir).map(Vec::as_slice).unwrap_or_default())
    }

    /// Directory holding the package sources, or `None` if it does not exist.
    fn locate_package(&self, import_path: &str) -> Result<Option<PathBuf>> {
        if let Some(rest) = import_path
            .strip_prefix(&self.ctx.module_path)
            .and_then(|rest| rest.strip_prefix('/'))
        {
            let dir = relative_to(&self.ctx.project_root, rest);
            return Ok(dir.is_dir().then_some(dir));
        }

        let vendored = relative_to(&self.ctx.vendor_dir, import_path);
        if vendored.is_dir() {
            return Ok(Some(vendored));
        }

        let Some(cache) = &self.ctx.module_cache else {
            return Err(AnalysisError::DependencyRootNotFound {
                import_path: import_path.to_string(),
            });
        };

        locate_in_module_cache(cache, import_path)
    }
}

fn relative_to(base: &Path, import_path: &str) -> PathBuf {
    import_path
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(base.to_path_buf(), |dir, segment| dir.join(segment))
}

/// Walk the escaped import path through the cache. At each segment take the
/// exact directory, else the highest `segment@version` sibling; stop at the
/// deepest directory reached. `None` if not even the first segment exists.
fn locate_in_module_cache(cache: &Path, import_path: &str) -> Result<Option<PathBuf>> {
    let escaped = escape_module_path(import_path);
    let mut dir = cache.to_path_buf();
    let mut depth = 0;

    for segment in escaped.split('/').filter(|s| !s.is_empty()) {
        let exact = dir.join(segment);
        if exact.is_dir() {
            dir = exact;
            depth += 1;
            continue;
        }
        match versioned_dir(&dir, segment)? {
            Some(versioned) => {
                dir = versioned;
                depth += 1;
            }
            None => break,
        }
    }

    Ok((depth > 0).then_some(dir))
}

/// Highest `segment@version` directory inside `dir`.
fn versioned_dir(dir: &Path, segment: &str) -> Result<Option<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| AnalysisError::io(dir, e))?;
    let prefix = format!("{segment}@");

    let mut best: Option<(VersionKey, PathBuf)> = None;
    for entry in entries {
        let entry = entry.map_err(|e| AnalysisError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().to_string();
        let Some(version) = name.strip_prefix(&prefix) else {
            continue;
        };
        if !entry.path().is_dir() {
            continue;
        }
        let key = VersionKey::parse(version);
        if best.as_ref().is_none_or(|(best_key, _)| key > *best_key) {
            best = Some((key, entry.path()));
        }
    }

    Ok(best.map(|(_, path)| path))
}

/// Orders `v1.10.0` above `v1.2.0`: numeric runs compare as numbers, the raw
/// text breaks ties.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct VersionKey {
    numbers: Vec<u64>,
    raw: String,
}

impl VersionKey {
    fn parse(version: &str) -> Self {
        let numbers = version
            .split(|c: char| !c.is_ascii_digit())
            .filter(|run| !run.is_empty())
            .map(|run| run.parse().unwrap_or(u64::MAX))
            .collect();
        Self {
            numbers,
            raw: version.to_string(),
        }
    }
}
