//! beangen - bean factory generator for Go
//!
//! beangen scans a Go source tree, finds every exported, non-generic struct
//! type, and writes a Go file that maps `"<import path>.<TypeName>"` to a
//! freshly allocated instance of that type, so objects can be looked up and
//! created by name at runtime.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (commands and reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Resolution, extraction, aggregation and emission pipeline

pub mod cli;
pub mod config;
pub mod core;
