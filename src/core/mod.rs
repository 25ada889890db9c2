//! Generation pipeline.
//!
//! 1. **Resolution** (`unit`, `module`): the scan root becomes a tree of
//!    compilation units, one per directory, each with its import path
//! 2. **Extraction** (`parsers`, `source_file`, `extract`): each unit's files
//!    are parsed once and reduced to exported, non-generic struct names
//! 3. **Aggregation** (`registry`): units are merged into a single registry
//!    keyed by import path
//! 4. **Emission** (`emit`): the registry is rendered as a Go source file
//!
//! [`GenerateContext`] drives the four phases for the CLI.

mod context;
pub mod emit;
pub mod error;
pub mod extract;
pub mod module;
pub mod parsers;
pub mod registry;
pub mod source_file;
pub mod unit;

pub use context::GenerateContext;
pub use emit::{Layout, Strategy};
pub use error::{EmitError, Error, ParseError, RegistryError, ResolutionError};
pub use registry::{CollisionPolicy, Registry, aggregate, make_registry_key};
pub use unit::{CompilationUnit, SourceTree, UnitResolver};
