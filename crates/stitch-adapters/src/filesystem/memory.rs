//! In-memory template source for testing.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use stitch_core::{
    application::{ApplicationError, ports::TemplateSource},
    error::StitchResult,
};

/// In-memory files with per-path read counters.
///
/// Clones share the same files, so a test can keep one handle and give
/// another to the engine.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, Vec<u8>>,
    reads: HashMap<PathBuf, usize>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Builder-style [`MemoryFilesystem::insert_file`].
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.insert_file(path, content);
        self
    }

    /// Add or replace a file.
    pub fn insert_file(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.insert(path.into(), content.into());
        }
    }

    /// Remove a file. Returns whether it existed.
    pub fn remove_file(&self, path: &Path) -> bool {
        self.inner
            .write()
            .map(|mut inner| inner.files.remove(path).is_some())
            .unwrap_or(false)
    }

    /// How many times `path` was read through the port (testing helper).
    pub fn read_count(&self, path: &Path) -> usize {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.reads.get(path).copied())
            .unwrap_or(0)
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self, path: &Path) -> StitchResult<Vec<u8>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let content = inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                path: path.to_path_buf(),
            }
        })?;
        *inner.reads.entry(path.to_path_buf()).or_insert(0) += 1;
        Ok(content)
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateSource for MemoryFilesystem {
    fn read_to_string(&self, path: &Path) -> StitchResult<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| {
            ApplicationError::SourceError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn read_bytes(&self, path: &Path) -> StitchResult<Vec<u8>> {
        self.read(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path))
            .unwrap_or(false)
    }
}
