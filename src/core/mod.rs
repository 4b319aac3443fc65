//! Core analysis engine.
//!
//! Phases, leaves first:
//!
//! - `parsers` / `scanner`: Go files → [`SourceUnit`]s
//! - `annotation`: struct tag → [`AnnotationDescriptor`]
//! - `graph`: reference counting and root selection
//! - `resolve`: lazy lookup of records in other packages
//! - `flatten`: roots → [`OutputEntry`]s
//! - `context`: the pipeline driver, [`analyze`]

pub mod annotation;
pub mod context;
pub mod data;
pub mod error;
pub mod file_scanner;
pub mod flatten;
pub mod graph;
pub mod output;
pub mod parsers;
pub mod resolve;
pub mod scanner;

pub use annotation::{AnnotationDescriptor, AnnotationExtractor};
pub use context::{Analysis, AnalysisContext, analyze};
pub use data::{Diagnostic, Field, Import, OutputEntry, RecordKey, RecordType, SourceUnit, TypeRef};
pub use error::AnalysisError;
pub use output::render_entries;
