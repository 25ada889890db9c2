//! A Go source file with a lazily parsed, parse-once cache.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
};

use crate::core::{
    error::ParseError,
    parsers::go::{Declaration, ParsedGoFile, parse_go_source},
};

#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    /// Serializes the first parse. Readers never touch it once `parsed` is set.
    parse_lock: Mutex<()>,
    parsed: OnceLock<ParsedGoFile>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            parse_lock: Mutex::new(()),
            parsed: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_parsed(&self) -> bool {
        self.parsed.get().is_some()
    }

    /// Parsed representation of the file, parsing it on first access.
    ///
    /// Concurrent first callers race for `parse_lock`; the winner parses and
    /// publishes, the others find the cached value on their re-check. A failed
    /// parse caches nothing.
    pub fn parsed(&self) -> Result<&ParsedGoFile, ParseError> {
        if let Some(parsed) = self.parsed.get() {
            return Ok(parsed);
        }

        // A poisoned lock only means another parser panicked; the cache is
        // still consistent because it is written once, after a full parse.
        let _guard = self
            .parse_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(parsed) = self.parsed.get() {
            return Ok(parsed);
        }

        let code = fs::read_to_string(&self.path).map_err(|source| ParseError::Read {
            path: self.path.clone(),
            source,
        })?;
        let parsed = parse_go_source(&code, &self.path)?;

        Ok(self.parsed.get_or_init(|| parsed))
    }

    pub fn declarations(&self) -> Result<&[Declaration], ParseError> {
        Ok(&self.parsed()?.declarations)
    }

    pub fn package_name(&self) -> Result<Option<&str>, ParseError> {
        Ok(self.parsed()?.package.as_deref())
    }
}
