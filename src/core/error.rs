//! Fatal error taxonomy for an analysis run.
//!
//! Anything in here aborts the whole run: no entries are produced. Conditions
//! that only drop a subtree of entries are reported as [`Diagnostic`]s instead.
//!
//! [`Diagnostic`]: crate::core::Diagnostic

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// `go.mod` is absent from the project root.
    #[error("go.mod not found in {}", .root.display())]
    ManifestNotFound { root: PathBuf },

    /// `go.mod` exists but carries no `module` directive.
    #[error("no module directive in {}", .path.display())]
    ModuleDirectiveMissing { path: PathBuf },

    /// A dependency needed resolving, but neither a vendored copy nor a
    /// module cache root was available.
    #[error("cannot locate dependency {import_path}: no vendor directory and no module cache root")]
    DependencyRootNotFound { import_path: String },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to access {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk project tree")]
    Walk(#[from] walkdir::Error),

    #[error("failed to load Go grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),
}

impl AnalysisError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
