//! File parsers for project sources and manifests.
//!
//! - `go`: Go source parser (uses tree-sitter for the syntax tree)
//! - `go_mod`: `go.mod` reader (module path only)

pub mod go;
pub mod go_mod;
