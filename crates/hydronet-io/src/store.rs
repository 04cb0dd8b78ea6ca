// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Storage port for raw table and manifest blobs, plus its two adapters.
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Key/blob storage. Keys are `/`-separated paths relative to the model
/// directory.
pub trait TableStore {
    /// Loads a blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError>;
    /// Persists a blob, replacing any previous one.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError>;
    /// Deletes a blob. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Key not present in store.
    #[error("not found: {0}")]
    NotFound(String),
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Stores blobs as files under a base directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    base: PathBuf,
}

impl FsStore {
    /// Store rooted at `base`, creating the directory if needed.
    pub fn new(base: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base = base.into();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(key)
    }
}

impl TableStore for FsStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_owned()))
            }
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(StoreError::Io(err)),
            _ => Ok(()),
        }
    }
}

/// In-memory [`TableStore`] for tests and dry runs.
///
/// Clones share the same data, so a test can hand one clone to the writer
/// and inspect another. Save attempts are counted and saving can be made to
/// fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    data: BTreeMap<String, Vec<u8>>,
    save_count: usize,
    fail_on_save: bool,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `save_raw` fail.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.lock().fail_on_save = fail;
    }

    /// Number of `save_raw` attempts, including failed ones.
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    /// Keys in lexicographic order.
    pub fn keys(&self) -> Vec<String> {
        self.lock().data.keys().cloned().collect()
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TableStore for MemoryStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.lock()
            .data
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.save_count += 1;
        if inner.fail_on_save {
            return Err(StoreError::Other("save disabled".into()));
        }
        inner.data.insert(key.to_owned(), data.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock().data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn fs_store_round_trips_nested_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path().join("model")).unwrap();
        store.save_raw("input/node.json", b"[]").unwrap();
        assert_eq!(store.load_raw("input/node.json").unwrap(), b"[]");
        store.remove("input/node.json").unwrap();
        store.remove("input/node.json").unwrap();
        assert!(matches!(
            store.load_raw("input/node.json"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn memory_store_clones_share_data() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.save_raw("a", b"1").unwrap();
        assert_eq!(other.load_raw("a").unwrap(), b"1");
        other.set_fail_on_save(true);
        assert!(store.save_raw("b", b"2").is_err());
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.keys(), ["a"]);
    }
}
