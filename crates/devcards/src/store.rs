use crate::prelude::*;
use crate::settings::{Settings, StoreKind};
use chrono::{DateTime, Utc};
use devcards_core::article::Article;
use devcards_core::feed::CacheEntry;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Source of the current time, injectable for tests
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Key/value store with per-entry expiry
///
/// Implementations serialize their own writes; callers add no locking.
pub trait CacheStore: Send + Sync {
    /// Return the stored list if present and not expired
    fn get(&self, key: &str) -> std::result::Result<Option<Vec<Article>>, Error>;

    /// Store a list for `ttl_secs` seconds, replacing any previous value
    fn set(&self, key: &str, articles: &[Article], ttl_secs: u64)
        -> std::result::Result<(), Error>;
}

/// Process-local store
pub struct MemoryStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> std::result::Result<Option<Vec<Article>>, Error> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| Error::Cache(format!("Cache lock poisoned: {e}")))?;

        let now = self.clock.now();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(now) => Ok(Some(entry.articles.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(
        &self,
        key: &str,
        articles: &[Article],
        ttl_secs: u64,
    ) -> std::result::Result<(), Error> {
        let entry = CacheEntry::new(articles.to_vec(), self.clock.now(), ttl_secs);

        self.entries
            .lock()
            .map_err(|e| Error::Cache(format!("Cache lock poisoned: {e}")))?
            .insert(key.to_string(), entry);

        Ok(())
    }
}

/// Store that keeps one JSON file per key under a directory
pub struct FileStore {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, Arc::new(SystemClock))
    }

    pub fn with_clock(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl CacheStore for FileStore {
    fn get(&self, key: &str) -> std::result::Result<Option<Vec<Article>>, Error> {
        let path = self.path_for(key);

        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| Error::Cache(format!("Failed to read {}: {}", path.display(), e)))?;

        let entry: CacheEntry = serde_json::from_str(&contents)
            .map_err(|e| Error::Cache(format!("Corrupt cache file {}: {}", path.display(), e)))?;

        if entry.is_fresh(self.clock.now()) {
            Ok(Some(entry.articles))
        } else {
            Ok(None)
        }
    }

    fn set(
        &self,
        key: &str,
        articles: &[Article],
        ttl_secs: u64,
    ) -> std::result::Result<(), Error> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            Error::Cache(format!(
                "Failed to create cache directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let entry = CacheEntry::new(articles.to_vec(), self.clock.now(), ttl_secs);
        let json = serde_json::to_string(&entry)
            .map_err(|e| Error::Cache(format!("Failed to serialize cache entry: {e}")))?;

        // Each writer gets its own temp file; the rename replaces the entry whole
        let path = self.path_for(key);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| {
            Error::Cache(format!("Failed to create temp file in {}: {}", self.dir.display(), e))
        })?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| Error::Cache(format!("Failed to write {}: {}", tmp.path().display(), e)))?;
        tmp.persist(&path)
            .map_err(|e| Error::Cache(format!("Failed to replace {}: {}", path.display(), e.error)))?;

        Ok(())
    }
}

/// Build the store selected in the settings
pub fn store_from_settings(settings: &Settings) -> Arc<dyn CacheStore> {
    match settings.store {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::File => Arc::new(FileStore::new(settings.cache_dir.clone())),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use chrono::TimeZone;

    /// Clock that only moves when told to
    pub struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap()),
            })
        }

        pub fn advance(&self, secs: i64) {
            let mut now = self.now.lock().unwrap();
            *now += chrono::Duration::seconds(secs);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }
}
