//! File-backed key-value store for native sessions
//!
//! The whole store is one JSON object on disk. Every write rewrites the file
//! through a temporary sibling and a rename, so a crash never leaves a
//! half-written store behind.

use serde_json::{Map, Value};
use shared::{KeyValueStore, StorageError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// JSON-file key-value store
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(StorageError::Unavailable(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        match serde_json::from_str::<Map<String, Value>>(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                // Same policy as a corrupt browser entry: start over
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding unreadable session file");
                Ok(Map::new())
            }
        }
    }

    fn write_all(&self, key: &str, entries: &Map<String, Value>) -> Result<(), StorageError> {
        let write_failed = |message: String| StorageError::WriteFailed {
            key: key.to_string(),
            message,
        };

        let serialized = serde_json::to_string_pretty(entries).map_err(|e| write_failed(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_failed(e.to_string()))?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serialized).map_err(|e| write_failed(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| write_failed(e.to_string()))?;
        Ok(())
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.guard();
        let entries = self.read_all()?;
        Ok(entries.get(key).and_then(|v| v.as_str()).map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.guard();
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(key, &entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.guard();
        let mut entries = self.read_all()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(key, &entries)
    }
}
