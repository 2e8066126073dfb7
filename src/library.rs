//! Pattern Library - resolves pattern names to raw configuration documents

use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{Result, TartanError};

pub const CONFIG_EXTENSION: &str = "json";
pub const DEFAULT_LIBRARY_DIR: &str = "patterns";

/// Where a pattern configuration comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternSource {
    /// Already-parsed document, passed through unchanged.
    Inline(Value),
    /// Bare pattern name, or a direct path when it ends in `.json`.
    Named(String),
}

impl From<Value> for PatternSource {
    fn from(value: Value) -> Self {
        Self::Inline(value)
    }
}

impl From<&str> for PatternSource {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for PatternSource {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

/// Lists the pattern identifiers a library knows about.
pub trait PatternCatalog {
    fn pattern_names(&self) -> Result<Vec<String>>;
}

/// Directory of `<name>.json` pattern files.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    dir: PathBuf,
}

impl PatternLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path a name would be loaded from.
    pub fn config_path(&self, name: &str) -> PathBuf {
        if name.ends_with(&format!(".{CONFIG_EXTENSION}")) {
            PathBuf::from(name)
        } else {
            self.dir.join(format!("{name}.{CONFIG_EXTENSION}"))
        }
    }

    /// Resolve a source to its raw document. Always re-reads from disk.
    pub fn resolve(&self, source: &PatternSource) -> Result<Value> {
        match source {
            PatternSource::Inline(value) => Ok(value.clone()),
            PatternSource::Named(name) => self.load(name),
        }
    }

    fn load(&self, name: &str) -> Result<Value> {
        let path = self.config_path(name);
        if !path.is_file() {
            return Err(TartanError::NotFound(path));
        }

        debug!(path = %path.display(), "loading pattern configuration");
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| TartanError::MalformedInput(e.to_string()))
    }
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new(DEFAULT_LIBRARY_DIR)
    }
}

impl PatternCatalog for PatternLibrary {
    /// Every `*.json` file not starting with `_`, extension stripped, sorted.
    fn pattern_names(&self) -> Result<Vec<String>> {
        let mut names = vec![];
        if !self.dir.is_dir() {
            return Ok(names);
        }

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map_or(true, |e| e != CONFIG_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !stem.starts_with('_') {
                    names.push(stem.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

/// Bulleted list of catalog entries for usage output.
pub fn catalog_listing(catalog: &dyn PatternCatalog) -> Result<String> {
    let names = catalog.pattern_names()?;
    if names.is_empty() {
        return Ok("  (none found)".to_string());
    }
    Ok(names
        .iter()
        .map(|name| format!("  - {name}"))
        .collect::<Vec<_>>()
        .join("\n"))
}
