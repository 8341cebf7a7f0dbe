use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::common::errors::{GuardError, Result};

/// A process-wide string key/value store.
///
/// Writes must be visible to every later `get`, with no caching in between.
/// Any failure to reach the backing store is `GuardError::StoreUnavailable`.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Return the value of `key`, storing `default` first if it is absent.
    ///
    /// Backends with a write lock override this so the absence check and
    /// the insert happen under the same lock as `put`.
    fn get_or_insert(&self, key: &str, default: &str) -> Result<String> {
        if let Some(value) = self.get(key)? {
            return Ok(value);
        }
        self.put(key, default)?;
        Ok(self.get(key)?.unwrap_or_default())
    }
}

/// Read a key, creating it with an empty value first if it is absent.
pub fn read_seeded(store: &dyn SettingsStore, key: &str) -> Result<String> {
    store.get_or_insert(key, "")
}

/// In-memory store, used in tests and as a scratch backend.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<BTreeMap<String, String>>,
    writes: AtomicUsize,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a single key
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.values.lock().insert(key.to_string(), value.to_string());
        store
    }

    /// Number of `put` calls made so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn get_or_insert(&self, key: &str, default: &str) -> Result<String> {
        let mut values = self.values.lock();
        if let Some(value) = values.get(key) {
            return Ok(value.clone());
        }
        values.insert(key.to_string(), default.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(default.to_string())
    }
}

/// Store persisted as a flat JSON object of string values.
///
/// Every call goes to disk, so a value written by another process is seen
/// on the next read. Writes go to a temporary file that is renamed over the
/// target, so a reader sees either the old or the new file, never a
/// partial one. Concurrent writers race and the last write wins.
#[derive(Debug)]
pub struct FileSettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, message: impl std::fmt::Display) -> GuardError {
        GuardError::StoreUnavailable {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| self.unavailable(e))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| self.unavailable(e))
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.unavailable(e))?;

        let json = serde_json::to_string_pretty(values).map_err(|e| self.unavailable(e))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.unavailable(e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| self.unavailable(e))?;
        tmp.persist(&self.path).map_err(|e| self.unavailable(e.error))?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)?;
        tracing::debug!(key, path = %self.path.display(), "settings value written");
        Ok(())
    }

    fn get_or_insert(&self, key: &str, default: &str) -> Result<String> {
        if let Some(value) = self.get(key)? {
            return Ok(value);
        }
        let _guard = self.write_lock.lock();
        let mut values = self.read_all()?;
        if let Some(value) = values.get(key) {
            return Ok(value.clone());
        }
        tracing::debug!(key, "seeding absent settings key");
        values.insert(key.to_string(), default.to_string());
        self.write_all(&values)?;
        Ok(default.to_string())
    }
}
