//! Template Store - memoized template text by absolute path.
//!
//! The first `get` for a path reads through the `TemplateSource` port; every
//! later `get` returns the cached text. Entries are never evicted by the
//! engine itself.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use tracing::{debug, instrument, trace};

use crate::{
    application::{ApplicationError, ports::TemplateSource},
    error::StitchResult,
};

/// Thread-safe, write-once cache of template text.
pub struct TemplateStore {
    source: Box<dyn TemplateSource>,
    cache: RwLock<HashMap<PathBuf, Arc<str>>>,
}

impl TemplateStore {
    /// Create an empty store reading through `source`.
    pub fn new(source: Box<dyn TemplateSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Get the text of `path`, reading it on first use.
    ///
    /// Two threads racing on the same uncached path may both read it, but
    /// the first insert wins and both receive the same text afterwards.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn get(&self, path: &Path) -> StitchResult<Arc<str>> {
        {
            let cache = self
                .cache
                .read()
                .map_err(|_| ApplicationError::StoreLockError)?;
            if let Some(text) = cache.get(path) {
                trace!("cache hit");
                return Ok(Arc::clone(text));
            }
        }

        debug!("cache miss, reading template");
        let text: Arc<str> = self.source.read_to_string(path)?.into();

        let mut cache = self
            .cache
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let entry = cache.entry(path.to_path_buf()).or_insert(text);
        Ok(Arc::clone(entry))
    }

    /// Read every path into the cache, stopping at the first failure.
    pub fn preload<P: AsRef<Path>>(&self, paths: impl IntoIterator<Item = P>) -> StitchResult<usize> {
        let mut loaded = 0;
        for path in paths {
            self.get(path.as_ref())?;
            loaded += 1;
        }
        debug!(loaded, "preloaded templates");
        Ok(loaded)
    }

    /// `true` if `path` is cached.
    pub fn contains(&self, path: &Path) -> bool {
        self.cache
            .read()
            .map(|cache| cache.contains_key(path))
            .unwrap_or(false)
    }

    /// Drop one cached entry. Returns whether it was present.
    pub fn invalidate(&self, path: &Path) -> StitchResult<bool> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(cache.remove(path).is_some())
    }

    /// Drop every cached entry.
    pub fn clear(&self) -> StitchResult<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        cache.clear();
        Ok(())
    }

    /// Get the number of cached templates.
    pub fn len(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
