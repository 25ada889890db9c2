//! Source parsers.
//!
//! - `go`: Go source files (tree-sitter-go), reduced to the package clause and
//!   top-level type declarations

pub mod go;
