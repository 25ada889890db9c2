//! Compilation unit resolution.
//!
//! A directory resolves to exactly one Go package: its import path, the
//! package name declared by its files, and the non-test `.go` files directly
//! inside it. Every subdirectory becomes a child unit, whether or not it holds
//! any Go code, so the result mirrors the directory tree.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use colored::Colorize;
use glob::Pattern;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::core::{
    error::{ResolutionError, Result},
    module::{GoModule, find_enclosing_module, read_module_in},
    source_file::SourceFile,
};

/// A resolved Go package and its subdirectory units.
#[derive(Debug)]
pub struct CompilationUnit {
    import_path: String,
    dir: PathBuf,
    package: Option<String>,
    files: Vec<SourceFile>,
    children: Vec<CompilationUnit>,
}

impl CompilationUnit {
    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Package name from the files' `package` clauses; `None` for a unit without files.
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn children(&self) -> &[CompilationUnit] {
        &self.children
    }

    /// This unit followed by all descendants, depth-first in directory order.
    pub fn iter(&self) -> impl Iterator<Item = &CompilationUnit> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let unit = stack.pop()?;
            stack.extend(unit.children.iter().rev());
            Some(unit)
        })
    }
}

/// The unit tree for one generation run.
#[derive(Debug)]
pub struct SourceTree {
    root: CompilationUnit,
}

impl SourceTree {
    pub fn root(&self) -> &CompilationUnit {
        &self.root
    }

    pub fn units(&self) -> impl Iterator<Item = &CompilationUnit> {
        self.root.iter()
    }

    pub fn unit_count(&self) -> usize {
        self.units().count()
    }

    pub fn file_count(&self) -> usize {
        self.units().map(|unit| unit.files.len()).sum()
    }
}

/// Builds a [`SourceTree`] from a directory.
pub struct UnitResolver {
    module_path: Option<String>,
    ignores: Vec<Pattern>,
    excluded: Vec<PathBuf>,
    parallel: bool,
    verbose: bool,
}

impl UnitResolver {
    pub fn new() -> Self {
        Self {
            module_path: None,
            ignores: Vec::new(),
            excluded: Vec::new(),
            parallel: true,
            verbose: false,
        }
    }

    /// Use `module_path` as the import path of the scan root instead of `go.mod`.
    pub fn with_module_path(mut self, module_path: Option<String>) -> Self {
        self.module_path = module_path.filter(|p| !p.is_empty());
        self
    }

    /// Skip subdirectories whose name matches any of these patterns.
    pub fn with_ignores(mut self, ignores: Vec<Pattern>) -> Self {
        self.ignores = ignores;
        self
    }

    /// Leave this file out of its unit, typically the generator's own output.
    ///
    /// The path does not have to exist yet.
    pub fn excluding(mut self, file: &Path) -> Self {
        if let Some(path) = canonical_file_path(file) {
            self.excluded.push(path);
        }
        self
    }

    /// Parse each directory's files on the rayon pool (default) or one by one.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn resolve(&self, root: &Path) -> Result<SourceTree> {
        if !root.exists() {
            return Err(ResolutionError::NotFound(root.to_path_buf()).into());
        }
        if !root.is_dir() {
            return Err(ResolutionError::NotADirectory(root.to_path_buf()).into());
        }
        let root =
            fs::canonicalize(root).map_err(|_| ResolutionError::NotFound(root.to_path_buf()))?;

        let import_path = match &self.module_path {
            Some(path) => path.trim_end_matches('/').to_string(),
            None => {
                let module = find_enclosing_module(&root)?
                    .ok_or_else(|| ResolutionError::NoModule(root.clone()))?;
                module_import_path(&module, &root)?
            }
        };

        let root = self.resolve_unit(&root, import_path)?;
        Ok(SourceTree { root })
    }

    fn resolve_unit(&self, dir: &Path, import_path: String) -> Result<CompilationUnit> {
        let mut files = Vec::new();
        let mut subdirs = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| ResolutionError::ReadDir {
                dir: dir.to_path_buf(),
                source,
            })?;
            let name = entry.file_name().to_string_lossy();

            if entry.file_type().is_dir() {
                if self.is_ignored(&name) {
                    if self.verbose {
                        eprintln!(
                            "{} Skipping ignored directory {}",
                            "note:".bold().cyan(),
                            entry.path().display()
                        );
                    }
                    continue;
                }
                subdirs.push(entry.into_path());
            } else if entry.file_type().is_file()
                && is_go_source(&name)
                && !self.excluded.iter().any(|p| p == entry.path())
            {
                files.push(SourceFile::new(entry.into_path()));
            }
        }

        if self.parallel {
            files
                .par_iter()
                .try_for_each(|file| file.parsed().map(|_| ()))?;
        }
        let files = self.drop_constrained(files)?;
        let package = package_name(dir, &files)?;

        if self.verbose && !files.is_empty() {
            eprintln!(
                "{} Resolved {} ({} file{})",
                "note:".bold().cyan(),
                import_path,
                files.len(),
                if files.len() == 1 { "" } else { "s" }
            );
        }

        let mut children = Vec::with_capacity(subdirs.len());
        for subdir in subdirs {
            let child_path = match read_module_in(&subdir)? {
                Some(module) => module.path,
                None => {
                    let name = subdir.file_name().unwrap_or_default().to_string_lossy();
                    format!("{}/{}", import_path, name)
                }
            };
            children.push(self.resolve_unit(&subdir, child_path)?);
        }

        Ok(CompilationUnit {
            import_path,
            dir: dir.to_path_buf(),
            package,
            files,
            children,
        })
    }

    /// Keep only files some build would compile; `//go:build ignore`
    /// helpers often declare `package main` next to a library package.
    fn drop_constrained(&self, files: Vec<SourceFile>) -> Result<Vec<SourceFile>> {
        let mut kept = Vec::with_capacity(files.len());
        for file in files {
            if file.parsed()?.ignored {
                if self.verbose {
                    eprintln!(
                        "{} Skipping {} (excluded by build constraints)",
                        "note:".bold().cyan(),
                        file.path().display()
                    );
                }
                continue;
            }
            kept.push(file);
        }
        Ok(kept)
    }

    fn is_ignored(&self, dir_name: &str) -> bool {
        self.ignores.iter().any(|pattern| pattern.matches(dir_name))
    }
}

impl Default for UnitResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Absolute form of `file`, resolving only its directory when it does not exist.
pub(crate) fn canonical_file_path(file: &Path) -> Option<PathBuf> {
    if let Ok(path) = fs::canonicalize(file) {
        return Some(path);
    }
    let name = file.file_name()?;
    let parent = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|dir| dir.join(name))
}

fn module_import_path(module: &GoModule, dir: &Path) -> Result<String> {
    module
        .import_path_of(dir)
        .ok_or_else(|| ResolutionError::NoModule(dir.to_path_buf()).into())
}

/// Candidate non-test Go files: `*.go`, minus `*_test.go` and names starting
/// with `.` or `_`. Build constraints are checked after parsing.
pub fn is_go_source(file_name: &str) -> bool {
    file_name.ends_with(".go")
        && !file_name.ends_with("_test.go")
        && !file_name.starts_with('.')
        && !file_name.starts_with('_')
}

/// The single package name declared across `files`.
fn package_name(dir: &Path, files: &[SourceFile]) -> Result<Option<String>> {
    let mut names = BTreeSet::new();
    for file in files {
        if let Some(name) = file.package_name()? {
            names.insert(name.to_string());
        }
    }

    if names.len() > 1 {
        return Err(ResolutionError::MultiplePackages {
            dir: dir.to_path_buf(),
            count: names.len(),
            packages: names.into_iter().collect(),
        }
        .into());
    }

    Ok(names.into_iter().next())
}
