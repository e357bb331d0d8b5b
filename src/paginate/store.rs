//! Session cursor persistence.
//!
//! Stores map a flat session key to a page index. They are injected into a
//! [`SessionRegistry`](super::SessionRegistry); nothing else touches them.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use crate::error::{Error, Result};

/// Key-value interface for durable session cursors.
pub trait SessionStore: Send + Sync {
    /// Read the stored page index for a key.
    fn get(&self, key: &str) -> Result<Option<usize>>;

    /// Store a page index. Writing the same value twice is a no-op.
    fn put(&self, key: &str, page: usize) -> Result<()>;

    /// Forget a key. Removing a missing key is a no-op.
    fn remove(&self, key: &str) -> Result<()>;
}

fn poisoned() -> Error {
    Error::Persistence("store lock poisoned".to_string())
}

/// In-process store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, usize>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or_default()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<usize>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).copied())
    }

    fn put(&self, key: &str, page: usize) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), page);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

/// Store backed by a flat JSON object on disk.
///
/// Every write rewrites the file through a temporary sibling and a rename,
/// so the file on disk always holds the last complete state.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, usize>>,
}

impl JsonFileStore {
    /// Open a store, loading existing entries. A missing file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let data = fs::read_to_string(&path)?;
            if data.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&data)?
            }
        } else {
            BTreeMap::new()
        };
        log::debug!("Opened session store {} ({} entries)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, usize>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<usize>> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(key).copied())
    }

    fn put(&self, key: &str, page: usize) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        if entries.get(key) == Some(&page) {
            return Ok(());
        }
        let previous = entries.insert(key.to_string(), page);
        if let Err(e) = self.flush(&entries) {
            // Keep memory consistent with what is on disk
            match previous {
                Some(value) => entries.insert(key.to_string(), value),
                None => entries.remove(key),
            };
            return Err(Error::Persistence(format!("{}: {}", self.path.display(), e)));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.flush(&entries) {
            entries.insert(key.to_string(), previous);
            return Err(Error::Persistence(format!("{}: {}", self.path.display(), e)));
        }
        Ok(())
    }
}
