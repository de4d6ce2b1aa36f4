//! Scope loading from JSON library files
//!
//! A scope document is the serde form of [`LibraryScope`]. Include entries
//! may embed their library or only name it; named-only includes are loaded
//! from the search paths as `<name>-<version>.json`, then `<name>.json`.

use anyhow::Result;
use octofhir_cql_diagnostics::{CQL0103, CQL0114, CQL0401, CQL0404, CQL0406, CqlError};
use octofhir_cql_library::LibraryScope;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Environment variable holding extra `:`-separated search paths
pub const LIBRARY_PATH_ENV: &str = "CQL_LIBRARY_PATH";

/// Loader that handles library file lookups and caching
pub struct ScopeLoader {
    /// Search paths for libraries
    search_paths: Vec<PathBuf>,
    /// Resolved documents (canonical path -> document with includes filled)
    cache: Arc<RwLock<HashMap<PathBuf, Arc<Value>>>>,
}

impl ScopeLoader {
    /// Create a new loader
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        let mut paths = search_paths;

        if let Ok(env_path) = std::env::var(LIBRARY_PATH_ENV) {
            for path in env_path.split(':') {
                if !path.is_empty() {
                    paths.push(PathBuf::from(path));
                }
            }
        }

        // Current directory is searched first
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        if !paths.contains(&current_dir) {
            paths.insert(0, current_dir);
        }

        Self {
            search_paths: paths,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Load a scope tree from a file
    pub fn load(&self, path: &Path) -> Result<LibraryScope> {
        let document = self.load_document(path, &mut Vec::new())?;
        let scope = LibraryScope::deserialize(document.as_ref()).map_err(|e| {
            CqlError::load(
                CQL0406,
                format!("Invalid library document: {}", e),
                path.display().to_string(),
            )
        })?;

        log::debug!(
            "Loaded {} with {} include(s) from {}",
            scope.formatted_name(),
            scope.includes.len(),
            path.display()
        );
        Ok(scope)
    }

    /// Find the file for a library in the search paths
    pub fn find_library(&self, name: &str, version: &str) -> Option<PathBuf> {
        [format!("{}-{}.json", name, version), format!("{}.json", name)]
            .iter()
            .find_map(|pattern| self.find_file(pattern))
    }

    /// Find a file in the search paths
    fn find_file(&self, filename: &str) -> Option<PathBuf> {
        self.search_paths
            .iter()
            .map(|search_path| search_path.join(filename))
            .find(|candidate| candidate.is_file())
    }

    /// Load a document with caching and cycle detection
    ///
    /// `chain` holds the documents on the include path that led here, so a
    /// cycle is only reported when one load reaches its own ancestor.
    fn load_document(&self, path: &Path, chain: &mut Vec<PathBuf>) -> Result<Arc<Value>> {
        let canonical_path = path.canonicalize().map_err(|e| {
            CqlError::load(
                CQL0404,
                format!("Failed to resolve path: {}", e),
                path.display().to_string(),
            )
        })?;

        if let Some(document) = self.cache.read().get(&canonical_path) {
            return Ok(Arc::clone(document));
        }

        if chain.contains(&canonical_path) {
            return Err(CqlError::load(
                CQL0114,
                format!("Circular include detected: {}", canonical_path.display()),
                path.display().to_string(),
            )
            .into());
        }

        chain.push(canonical_path.clone());
        let result = self.read_document(&canonical_path, chain);
        chain.pop();

        let document = Arc::new(result?);
        self.cache
            .write()
            .insert(canonical_path, Arc::clone(&document));
        Ok(document)
    }

    fn read_document(&self, path: &Path, chain: &mut Vec<PathBuf>) -> Result<Value> {
        let content = fs::read_to_string(path).map_err(|e| {
            CqlError::load(
                CQL0401,
                format!("Failed to read file: {}", e),
                path.display().to_string(),
            )
        })?;
        let mut document: Value = serde_json::from_str(&content).map_err(|e| {
            CqlError::load(
                CQL0406,
                format!("Invalid JSON: {}", e),
                path.display().to_string(),
            )
        })?;
        self.fill_includes(&mut document, path, chain)?;
        Ok(document)
    }

    /// Attach a library to every include entry that only names one
    fn fill_includes(
        &self,
        document: &mut Value,
        origin: &Path,
        chain: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let Some(includes) = document.get_mut("includes").and_then(Value::as_array_mut) else {
            return Ok(());
        };

        for entry in includes {
            // Malformed entries are left for deserialization to report
            let Some(entry) = entry.as_object_mut() else {
                continue;
            };
            if let Some(library) = entry.get_mut("library").filter(|l| !l.is_null()) {
                self.fill_includes(library, origin, chain)?;
                continue;
            }

            let name = entry
                .get("libraryName")
                .and_then(Value::as_str)
                .map(str::to_string);
            let version = entry
                .get("version")
                .and_then(Value::as_str)
                .map(str::to_string);
            let (Some(name), Some(version)) = (name, version) else {
                continue;
            };

            let path = self.find_library(&name, &version).ok_or_else(|| {
                CqlError::load(
                    CQL0103,
                    format!("Library not found: {} version {}", name, version),
                    origin.display().to_string(),
                )
            })?;
            log::debug!("Loading {}-{} from {}", name, version, path.display());

            // Each include edge gets its own copy of the cached document
            let library = self.load_document(&path, chain)?;
            entry.insert("library".to_string(), library.as_ref().clone());
        }
        Ok(())
    }

    /// Get the search paths
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}
