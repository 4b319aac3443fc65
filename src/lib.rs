//! goprintenv - list the environment variables a Go project reads
//!
//! goprintenv is a CLI tool and library that walks a Go module, finds every
//! struct field tagged with `env:"..."`, and flattens nested configuration
//! structs (including ones from vendored or cached dependencies) into
//! `NAME=default` pairs.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing and reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Core analysis engine (scan, graph, resolve, flatten)

pub mod cli;
pub mod config;
pub mod core;
