//! Local key-value fallback store
//!
//! String keys to string values, like a browser's `localStorage`.
//! Calls are synchronous; nothing here suspends.

use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use savegame_shared::LocalStoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Persistent key-value store
pub trait LocalStore: Send + Sync {
    /// Read the value under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    /// Overwrite the value under `key`
    fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;
}

/// Read and decode a JSON value stored under `key`
pub fn read_json<T: DeserializeOwned>(
    store: &dyn LocalStore,
    key: &str,
) -> Result<Option<T>, LocalStoreError> {
    let Some(raw) = store.get_item(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| LocalStoreError::Malformed {
            key: key.to_string(),
            source,
        })
}

/// Encode `value` as JSON and store it under `key`
pub fn write_json<T: Serialize>(
    store: &dyn LocalStore,
    key: &str,
    value: &T,
) -> Result<(), LocalStoreError> {
    let raw = serde_json::to_string(value).map_err(|source| LocalStoreError::Malformed {
        key: key.to_string(),
        source,
    })?;
    store.set_item(key, &raw)
}

/// File-backed store: one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileLocalStore {
    dir: PathBuf,
}

impl FileLocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get the file path for a key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl LocalStore for FileLocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        std::fs::create_dir_all(&self.dir)?;

        // Readers never see a half-written file. Each write gets its own
        // temp file so concurrent writers to one key cannot collide.
        let path = self.path_for(key);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;

        tracing::trace!(path = %path.display(), bytes = value.len(), "Local item written");
        Ok(())
    }
}

/// In-memory store with an optional byte quota
#[derive(Debug, Default)]
pub struct InMemoryLocalStore {
    items: RwLock<HashMap<String, String>>,
    capacity: Option<usize>,
}

impl InMemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size of keys plus values to `bytes`
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            capacity: Some(bytes),
        }
    }
}

impl LocalStore for InMemoryLocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        let items = self
            .items
            .read()
            .map_err(|_| LocalStoreError::Poisoned("read"))?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        let mut items = self
            .items
            .write()
            .map_err(|_| LocalStoreError::Poisoned("write"))?;

        if let Some(capacity) = self.capacity {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = key.len() + value.len();
            if used + needed > capacity {
                return Err(LocalStoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    capacity: capacity.saturating_sub(used),
                });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
