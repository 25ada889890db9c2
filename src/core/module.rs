//! Go module discovery: maps directories to import paths via `go.mod`.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use crate::core::error::ResolutionError;

pub const GO_MOD_FILE: &str = "go.mod";

/// A Go module: the directory holding `go.mod` and the declared module path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    pub root: PathBuf,
    pub path: String,
}

impl GoModule {
    /// Import path of `dir`, which must live under this module's root.
    pub fn import_path_of(&self, dir: &Path) -> Option<String> {
        let rel = dir.strip_prefix(&self.root).ok()?;
        let mut import_path = self.path.clone();
        for component in rel.components() {
            match component {
                Component::Normal(name) => {
                    import_path.push('/');
                    import_path.push_str(&name.to_string_lossy());
                }
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(import_path)
    }
}

/// Read the module path declared in a `go.mod` file in `dir`, if there is one.
pub fn read_module_in(dir: &Path) -> Result<Option<GoModule>, ResolutionError> {
    let mod_file = dir.join(GO_MOD_FILE);
    if !mod_file.is_file() {
        return Ok(None);
    }

    let content =
        fs::read_to_string(&mod_file).map_err(|e| ResolutionError::InvalidModuleFile {
            path: mod_file.clone(),
            reason: e.to_string(),
        })?;

    let path = parse_module_directive(&content).ok_or_else(|| {
        ResolutionError::InvalidModuleFile {
            path: mod_file.clone(),
            reason: "no module directive".to_string(),
        }
    })?;

    Ok(Some(GoModule {
        root: dir.to_path_buf(),
        path,
    }))
}

/// Walk up from `start_dir` to the nearest directory containing `go.mod`.
pub fn find_enclosing_module(start_dir: &Path) -> Result<Option<GoModule>, ResolutionError> {
    let mut current = start_dir.to_path_buf();

    loop {
        if let Some(module) = read_module_in(&current)? {
            return Ok(Some(module));
        }
        if !current.pop() {
            return Ok(None);
        }
    }
}

/// Extract the path from the `module` directive of a `go.mod` file.
///
/// Handles the quoted form (`module "example.com/m"`) and trailing comments.
pub fn parse_module_directive(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or_default().trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) && !rest.starts_with('"') {
            return None;
        }
        let path = rest.trim().trim_matches(|c: char| c == '"' || c == '`');
        (!path.is_empty()).then(|| path.to_string())
    })
}
