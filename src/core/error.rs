//! Error types for the generation pipeline.
//!
//! Every variant is terminal: a run that hits one of these stops before any
//! output is written.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// A directory did not resolve to exactly one compilation unit.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("No go.mod found above {} (pass --module-path to set the import path)", .0.display())]
    NoModule(PathBuf),

    #[error("Invalid go.mod at {}: {reason}", .path.display())]
    InvalidModuleFile { path: PathBuf, reason: String },

    #[error("{count} packages found in {}: {}", .dir.display(), .packages.join(", "))]
    MultiplePackages {
        dir: PathBuf,
        count: usize,
        packages: Vec<String>,
    },

    #[error("Cannot read directory {}: {source}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A source file could not be read or is syntactically invalid.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Syntax error in {}:{line}:{col}: {message}", .path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        col: usize,
        message: String,
    },

    #[error("Failed to load Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("Parser produced no syntax tree for {}", .0.display())]
    NoTree(PathBuf),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(
        "Package path '{unit_path}' is declared by both {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateUnit {
        unit_path: String,
        first: PathBuf,
        second: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("Target package name is empty")]
    MissingPackage,

    #[error("'{0}' is not a valid Go package identifier")]
    InvalidIdentifier(String),

    #[error(
        "Output directory {} holds package '{found}', so the generated file cannot declare package '{expected}'",
        .dir.display()
    )]
    PackageMismatch {
        dir: PathBuf,
        found: String,
        expected: String,
    },

    #[error("Skeleton is missing {0}")]
    Skeleton(&'static str),

    #[error("Skeleton failed to parse: {0}")]
    SkeletonParse(#[from] ParseError),

    #[error("Failed to serialize generated source")]
    Serialize(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
