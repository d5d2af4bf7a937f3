use std::{io::ErrorKind, path::PathBuf};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{config, error::Res};

/// A cached list together with the time it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub fetch_time_ms: i64,
    pub items: Vec<T>,
}

impl<T> CacheEntry<T> {
    pub fn new(items: Vec<T>, fetch_time_ms: i64) -> Self {
        Self {
            fetch_time_ms,
            items,
        }
    }

    /// An entry is fresh while it was fetched no earlier than `max_age_ms`
    /// before `now_ms`.
    pub fn is_fresh(&self, now_ms: i64, max_age_ms: i64) -> bool {
        self.fetch_time_ms >= now_ms - max_age_ms
    }
}

#[derive(Deserialize)]
struct CacheStamp {
    fetch_time_ms: i64,
}

/// JSON file cache, one file per key below a root directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn default_root() -> PathBuf {
        config::cache_dir()
    }

    /// Loads the entry stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored. A file that no longer parses
    /// (for example after a format change) is treated as a miss.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Res<Option<CacheEntry<T>>> {
        let path = self.path(key);
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                warn!(key, error = %e, "Ignoring unreadable cache entry");
                Ok(None)
            }
        }
    }

    pub async fn store<T: Serialize>(&self, key: &str, entry: &CacheEntry<T>) -> Res<()> {
        async_fs::create_dir_all(&self.root).await?;
        let json = serde_json::to_string_pretty(entry)?;
        async_fs::write(self.path(key), json).await?;
        debug!(key, items = entry.items.len(), "Stored cache entry");
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Res<()> {
        match async_fs::remove_file(self.path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes every entry among `keys` fetched before `min_fetch_time_ms`.
    /// Returns how many entries were removed.
    pub async fn prune_older_than(&self, keys: &[String], min_fetch_time_ms: i64) -> Res<usize> {
        let mut removed = 0;
        for key in keys {
            let content = match async_fs::read_to_string(self.path(key)).await {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            let stale = serde_json::from_str::<CacheStamp>(&content)
                .map(|stamp| stamp.fetch_time_ms < min_fetch_time_ms)
                .unwrap_or(true);
            if stale {
                self.remove(key).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_freshness() {
        let entry = CacheEntry::new(vec![1, 2, 3], 1_000);
        assert!(entry.is_fresh(1_500, 500));
        assert!(!entry.is_fresh(1_501, 500));
    }

    #[tokio::test]
    async fn test_load_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().to_path_buf());
        let entry: Option<CacheEntry<String>> = store.load("nothing").await.unwrap();
        assert!(entry.is_none());
    }

    #[tokio::test]
    async fn test_store_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("cache"));
        let entry = CacheEntry::new(vec!["a".to_string(), "b".to_string()], 42);

        store.store("letters", &entry).await.unwrap();
        let loaded: CacheEntry<String> = store.load("letters").await.unwrap().unwrap();
        assert_eq!(loaded, entry);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        let store = CacheStore::new(dir.path().to_path_buf());

        let loaded: Option<CacheEntry<String>> = store.load("broken").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_prune_removes_only_stale_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().to_path_buf());
        store.store("old", &CacheEntry::new(vec![1], 100)).await.unwrap();
        store.store("new", &CacheEntry::new(vec![2], 900)).await.unwrap();

        let keys = vec!["old".to_string(), "new".to_string(), "absent".to_string()];
        let removed = store.prune_older_than(&keys, 500).await.unwrap();

        assert_eq!(removed, 1);
        assert!(store.load::<i32>("old").await.unwrap().is_none());
        assert!(store.load::<i32>("new").await.unwrap().is_some());
    }
}
