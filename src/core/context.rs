use std::path::{Path, PathBuf};

use crate::{
    config::Config,
    core::{
        annotation::AnnotationExtractor,
        data::{Diagnostic, OutputEntry},
        error::Result,
        flatten::Flattener,
        graph::ReferenceGraph,
        parsers::go_mod::read_module_path,
        resolve::{DependencyResolver, ResolverContext, module_cache_root},
        scanner::scan_project,
    },
};

/// Outcome of one analysis run.
#[derive(Debug, Default)]
pub struct Analysis {
    /// Flattened entries: roots in discovery order, fields in declaration order.
    pub entries: Vec<OutputEntry>,
    /// Subtrees that were skipped, and why.
    pub diagnostics: Vec<Diagnostic>,
    pub module_path: String,
    pub files_scanned: usize,
    pub record_count: usize,
    pub root_count: usize,
    /// Directories scanned on demand while resolving nested types.
    pub dependency_dirs_scanned: usize,
}

/// Orchestrates a single analysis run.
///
/// # Pipeline
///
/// 1. **Scan**: read `go.mod`, walk the project, parse every Go file
/// 2. **Graph**: index records, count same-package references, pick roots
/// 3. **Flatten**: expand each root, scanning dependencies on demand
///
/// The run is sequential; any fatal error aborts it without partial output.
pub struct AnalysisContext {
    pub config: Config,
    pub project_root: PathBuf,
    /// Module cache root, if one is available.
    pub module_cache: Option<PathBuf>,
}

impl AnalysisContext {
    pub fn new(project_root: impl Into<PathBuf>, config: Config, module_cache: Option<PathBuf>) -> Self {
        Self {
            config,
            project_root: project_root.into(),
            module_cache,
        }
    }

    pub fn analyze(&self) -> Result<Analysis> {
        let root = self.project_root.as_path();
        let module_path = read_module_path(root)?;

        let units = scan_project(
            root,
            &module_path,
            &self.config.vendor_dir,
            &self.config.ignore_patterns(),
        )?;

        let extractor = AnnotationExtractor::from_config(&self.config);
        let graph = ReferenceGraph::build(&units);
        let roots = graph.roots(&extractor);

        let mut resolver = DependencyResolver::new(ResolverContext {
            project_root: root.to_path_buf(),
            module_path: module_path.clone(),
            vendor_dir: root.join(&self.config.vendor_dir),
            module_cache: self.module_cache.clone(),
        });

        let mut flattener = Flattener::new(&graph, &extractor, &mut resolver);
        let mut entries = Vec::new();
        for record in &roots {
            entries.extend(flattener.flatten("", record)?);
        }
        let diagnostics = flattener.into_diagnostics();

        Ok(Analysis {
            entries,
            diagnostics,
            module_path,
            files_scanned: units.len(),
            record_count: graph.len(),
            root_count: roots.len(),
            dependency_dirs_scanned: resolver.scanned_dirs(),
        })
    }
}

/// Analyze a project with default configuration, taking the module cache
/// root from `GOMODCACHE` / `GOPATH`.
pub fn analyze(project_root: &Path) -> Result<Vec<OutputEntry>> {
    let gomodcache = std::env::var_os("GOMODCACHE").map(PathBuf::from);
    let gopath = std::env::var("GOPATH").ok();
    let module_cache = module_cache_root(gomodcache.as_deref(), gopath.as_deref());

    AnalysisContext::new(project_root, Config::default(), module_cache)
        .analyze()
        .map(|analysis| analysis.entries)
}
