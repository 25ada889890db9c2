//! Aggregation of a unit tree into a registry of constructible types.

use std::{
    collections::{BTreeMap, btree_map::Entry},
    path::PathBuf,
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::{
    error::{RegistryError, Result},
    extract::exported_struct_names,
    unit::CompilationUnit,
};

/// What to do when two directories resolve to the same import path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Fail the run.
    #[default]
    Reject,
    /// Keep the entry merged last in directory traversal order.
    LastWins,
}

/// The registrable types of one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryUnit {
    /// Package name used to qualify the types in generated code.
    pub package: String,
    /// Type names in file order, then source order.
    pub types: Vec<String>,
    /// Directory the package was resolved from.
    pub dir: PathBuf,
}

/// Import path → registrable types, ordered by import path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    units: BTreeMap<String, RegistryUnit>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, import_path: &str) -> Option<&[String]> {
        self.units.get(import_path).map(|unit| unit.types.as_slice())
    }

    pub fn unit(&self, import_path: &str) -> Option<&RegistryUnit> {
        self.units.get(import_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegistryUnit)> {
        self.units.iter().map(|(path, unit)| (path.as_str(), unit))
    }

    /// Number of packages with at least one registrable type.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn type_count(&self) -> usize {
        self.units.values().map(|unit| unit.types.len()).sum()
    }

    /// Lookup keys of the generated factory: `<import path>.<TypeName>`.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.iter().flat_map(|(path, unit)| {
            unit.types
                .iter()
                .map(move |name| make_registry_key(path, name))
        })
    }

    pub fn insert(
        &mut self,
        import_path: String,
        unit: RegistryUnit,
        policy: CollisionPolicy,
    ) -> Result<()> {
        match self.units.entry(import_path) {
            Entry::Vacant(entry) => {
                entry.insert(unit);
            }
            Entry::Occupied(mut entry) => match policy {
                CollisionPolicy::LastWins => {
                    entry.insert(unit);
                }
                CollisionPolicy::Reject => {
                    return Err(RegistryError::DuplicateUnit {
                        unit_path: entry.key().clone(),
                        first: entry.get().dir.clone(),
                        second: unit.dir,
                    }
                    .into());
                }
            },
        }
        Ok(())
    }

    /// Merge `other` into `self`; `other`'s entries are the later writers.
    pub fn merge(&mut self, other: Registry, policy: CollisionPolicy) -> Result<()> {
        for (import_path, unit) in other.units {
            self.insert(import_path, unit, policy)?;
        }
        Ok(())
    }
}

pub fn make_registry_key(import_path: &str, type_name: &str) -> String {
    format!("{}.{}", import_path, type_name)
}

/// Collect the registrable types of `unit` and all of its descendants.
///
/// Packages without files, or whose files declare no exported struct, are left
/// out entirely so the generated code never imports a package it doesn't use.
/// So are `main` packages, which Go cannot import.
pub fn aggregate(unit: &CompilationUnit, policy: CollisionPolicy) -> Result<Registry> {
    let mut registry = Registry::new();

    let mut types = Vec::new();
    if !is_main_package(unit) {
        for file in unit.files() {
            types.extend(exported_struct_names(file)?);
        }
    }

    if !types.is_empty() {
        let package = unit
            .package()
            .map(str::to_string)
            .unwrap_or_else(|| last_segment(unit.import_path()).to_string());
        registry.insert(
            unit.import_path().to_string(),
            RegistryUnit {
                package,
                types,
                dir: unit.dir().to_path_buf(),
            },
            policy,
        )?;
    }

    for child in unit.children() {
        registry.merge(aggregate(child, policy)?, policy)?;
    }

    Ok(registry)
}

pub fn is_main_package(unit: &CompilationUnit) -> bool {
    unit.package() == Some(MAIN_PACKAGE)
}

const MAIN_PACKAGE: &str = "main";

pub(crate) fn last_segment(import_path: &str) -> &str {
    import_path.rsplit('/').next().unwrap_or(import_path)
}
