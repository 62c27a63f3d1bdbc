//! Loaded mock cache.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::mock::loader::{load_mock_spec, LoadError, MockSpec};

/// Source of `MockSpec`s for the dispatcher.
///
/// When disabled every lookup reads the file again, so edits show up on the
/// next request even without a watcher. When enabled, successful loads are
/// kept per source file until [`MockCache::clear`]. Cached specs are shared
/// immutably; rendering never touches them.
#[derive(Clone, Debug, Default)]
pub struct MockCache {
    inner: Arc<DashMap<PathBuf, Cached>>,
    generation: Arc<AtomicU64>,
    enabled: bool,
}

/// A spec tagged with the cache generation it was read in.
#[derive(Debug)]
struct Cached {
    generation: u64,
    spec: Arc<MockSpec>,
}

impl MockCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Return the spec for `path`, loading it on a miss.
    ///
    /// Failed loads are never cached. A load that straddles a
    /// [`MockCache::clear`] is never served from the cache afterwards.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<MockSpec>, LoadError> {
        if !self.enabled {
            return load_mock_spec(path).map(Arc::new);
        }

        let generation = self.generation.load(Ordering::Acquire);
        let hit = self
            .inner
            .get(path)
            .filter(|entry| entry.generation == generation)
            .map(|entry| Arc::clone(&entry.spec));
        if let Some(spec) = hit {
            return Ok(spec);
        }

        let spec = Arc::new(load_mock_spec(path)?);
        self.store(path, Arc::clone(&spec), generation);
        Ok(spec)
    }

    /// [`MockCache::get_or_load`] on the blocking pool, off the async workers.
    pub async fn load(&self, path: &Path) -> Result<Arc<MockSpec>, LoadError> {
        let cache = self.clone();
        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || cache.get_or_load(&owned))
            .await
            .map_err(|source| LoadError::Interrupted {
                path: path.to_path_buf(),
                source,
            })?
    }

    fn store(&self, path: &Path, spec: Arc<MockSpec>, generation: u64) {
        if generation != self.generation.load(Ordering::Acquire) {
            tracing::debug!(file = %path.display(), "Discarding mock read before reload");
            return;
        }
        self.inner.insert(path.to_path_buf(), Cached { generation, spec });
        tracing::debug!(file = %path.display(), cached = self.inner.len(), "Cached mock");
    }

    /// Drop every cached spec, including loads still in flight.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::NamedTempFile;

    fn mock_file(content: &str) -> NamedTempFile {
        let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        fs::write(file.path(), content).unwrap();
        file
    }

    #[test]
    fn test_disabled_cache_reads_fresh() {
        let file = mock_file(r#"{"v":1}"#);
        let cache = MockCache::new(false);

        assert_eq!(cache.get_or_load(file.path()).unwrap().body, json!({ "v": 1 }));
        fs::write(file.path(), r#"{"v":2}"#).unwrap();
        assert_eq!(cache.get_or_load(file.path()).unwrap().body, json!({ "v": 2 }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_enabled_cache_until_cleared() {
        let file = mock_file(r#"{"v":1}"#);
        let cache = MockCache::new(true);

        let first = cache.get_or_load(file.path()).unwrap();
        fs::write(file.path(), r#"{"v":2}"#).unwrap();
        let second = cache.get_or_load(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.body, json!({ "v": 1 }));

        cache.clear();
        assert_eq!(cache.get_or_load(file.path()).unwrap().body, json!({ "v": 2 }));
    }

    #[test]
    fn test_failures_not_cached() {
        let file = mock_file("{ broken");
        let cache = MockCache::new(true);

        assert!(cache.get_or_load(file.path()).is_err());
        assert_eq!(cache.len(), 0);

        fs::write(file.path(), "[]").unwrap();
        assert_eq!(cache.get_or_load(file.path()).unwrap().body, json!([]));
    }

    #[tokio::test]
    async fn test_async_load_shares_cache() {
        let file = mock_file(r#"{"v":1}"#);
        let cache = MockCache::new(true);

        let first = cache.load(file.path()).await.unwrap();
        let second = cache.get_or_load(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        let missing = file.path().with_file_name("missing.json");
        assert!(matches!(cache.load(&missing).await, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_load_before_clear_is_not_stored() {
        let file = mock_file(r#"{"v":1}"#);
        let cache = MockCache::new(true);

        let generation = cache.generation.load(Ordering::Acquire);
        let stale = Arc::new(load_mock_spec(file.path()).unwrap());

        cache.clear();
        fs::write(file.path(), r#"{"v":2}"#).unwrap();
        cache.store(file.path(), stale, generation);

        assert!(cache.is_empty());
        assert_eq!(cache.get_or_load(file.path()).unwrap().body, json!({ "v": 2 }));
    }

    #[test]
    fn test_entry_from_old_generation_is_ignored() {
        let file = mock_file(r#"{"v":1}"#);
        let cache = MockCache::new(true);

        let generation = cache.generation.load(Ordering::Acquire);
        let stale = Arc::new(load_mock_spec(file.path()).unwrap());

        cache.clear();
        fs::write(file.path(), r#"{"v":2}"#).unwrap();
        // Inserted after the clear, as a store that passed its check just before it would be.
        cache.inner.insert(file.path().to_path_buf(), Cached { generation, spec: stale });

        assert_eq!(cache.get_or_load(file.path()).unwrap().body, json!({ "v": 2 }));
    }
}
