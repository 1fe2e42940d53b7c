//! JSON file-based storage backend.
//!
//! This module provides a simple, human-readable key/value store using JSON
//! serialization. It uses atomic file writes (write-to-temp + rename) so a crash
//! mid-write never leaves a truncated document behind.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(log n) - the whole file is loaded into memory once
//! - **Write**: O(n) - serializes and writes the entire document
//! - **Best for**: a handful of small keys written on user actions

use crate::domain::error::{GifseekError, Result};
use crate::storage::backend::Storage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// JSON storage container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    /// Stored values by key.
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// The entire document is kept in memory and persisted on every mutation.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "credential_override": "abc123",
///     "favorites": "[{\"id\":\"a\",\"url\":\"https://giphy.com/a\",\"title\":\"X\"}]"
///   }
/// }
/// ```
#[derive(Debug)]
pub struct JsonStorage {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// In-memory copy of the document, loaded on creation.
    data: StorageData,
}

impl JsonStorage {
    /// Creates or opens a JSON storage backend.
    ///
    /// If the file exists, loads existing data. Otherwise starts empty; the file
    /// is created on the first write. Parent directories are created eagerly.
    ///
    /// A file that exists but does not parse is moved aside to
    /// `<name>.corrupt` and the store starts empty at the same path, so later
    /// writes still persist.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File permissions prevent reading
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gifseek::storage::JsonStorage;
    /// use std::path::PathBuf;
    ///
    /// let storage = JsonStorage::new(PathBuf::from("/tmp/gifseek/store.json"))?;
    /// # Ok::<(), gifseek::GifseekError>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        tracing::debug!(entry_count = data.entries.len(), "storage initialized");

        Ok(Self { file_path, data })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = match serde_json::from_str(&contents) {
            Ok(data) => data,
            Err(e) => {
                let mut aside = path.as_os_str().to_owned();
                aside.push(".corrupt");
                let aside = PathBuf::from(aside);
                tracing::warn!(
                    path = ?path,
                    moved_to = ?aside,
                    error = %e,
                    "storage file unreadable, starting empty"
                );
                if let Err(rename_err) = std::fs::rename(path, &aside) {
                    tracing::warn!(error = %rename_err, "could not move unreadable storage file aside");
                }
                return Ok(StorageData::default());
            }
        };

        if data.version != FORMAT_VERSION {
            tracing::warn!(
                found = data.version,
                expected = FORMAT_VERSION,
                "storage format version mismatch, reading anyway"
            );
        }

        Ok(data)
    }

    /// Saves the document to disk using an atomic write.
    fn save_to_file(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| GifseekError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_set", key = %key, len = value.len()).entered();

        let previous = self.data.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save_to_file() {
            match previous {
                Some(old) => self.data.entries.insert(key.to_string(), old),
                None => self.data.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let _span = tracing::debug_span!("json_remove", key = %key).entered();

        let Some(previous) = self.data.entries.remove(key) else {
            tracing::trace!("key absent, skipping save");
            return Ok(());
        };
        if let Err(e) = self.save_to_file() {
            self.data.entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(dir: &TempDir) -> JsonStorage {
        JsonStorage::new(dir.path().join("nested").join("store.json")).unwrap()
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir);
        assert_eq!(storage.get("anything").unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut storage = open(&dir);
            storage.set("credential_override", "k1").unwrap();
            storage.set("favorites", "[]").unwrap();
        }
        let storage = open(&dir);
        assert_eq!(storage.get("credential_override").unwrap().as_deref(), Some("k1"));
        assert_eq!(storage.get("favorites").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn remove_persists() {
        let dir = TempDir::new().unwrap();
        {
            let mut storage = open(&dir);
            storage.set("k", "v").unwrap();
            storage.remove("k").unwrap();
            storage.remove("never-set").unwrap();
        }
        assert_eq!(open(&dir).get("k").unwrap(), None);
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let mut storage = open(&dir);
        storage.set("k", "v").unwrap();
        assert!(storage.path().exists());
        assert!(!storage.path().with_extension("tmp").exists());
    }

    #[test]
    fn corrupt_file_is_moved_aside_and_store_stays_persistent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();

        {
            let mut storage = JsonStorage::new(path.clone()).unwrap();
            assert_eq!(storage.get("favorites").unwrap(), None);
            storage.set("favorites", "[]").unwrap();
        }

        assert_eq!(
            std::fs::read_to_string(dir.path().join("store.json.corrupt")).unwrap(),
            "{not json"
        );
        let reopened = JsonStorage::new(path).unwrap();
        assert_eq!(reopened.get("favorites").unwrap().as_deref(), Some("[]"));
    }
}
