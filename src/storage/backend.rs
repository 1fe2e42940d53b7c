//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait, a minimal synchronous key/value
//! interface. The favorites set and the credential override are each stored
//! under a single string key, so this is all persistence needs to offer.
//!
//! [`SharedStorage`] lets several consumers hold the same backend, which keeps
//! one JSON file as the single source of truth for both stores.

use crate::domain::error::{GifseekError, Result};
use std::sync::{Arc, Mutex};

/// Abstraction over persistent string key/value backends.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes
/// - [`MemoryStorage`](crate::storage::MemoryStorage): process-local map
/// - [`SharedStorage`]: reference-counted handle to another backend
///
/// # Examples
///
/// ```
/// use gifseek::storage::{MemoryStorage, Storage};
///
/// let mut storage = MemoryStorage::default();
/// storage.set("greeting", "hello")?;
/// assert_eq!(storage.get("greeting")?.as_deref(), Some("hello"));
/// storage.remove("greeting")?;
/// assert_eq!(storage.get("greeting")?, None);
/// # Ok::<(), gifseek::GifseekError>(())
/// ```
pub trait Storage: Send {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key has never been written or was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// The write is durable when this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Cloneable handle to a single backend.
///
/// Every clone reads and writes the same underlying storage.
#[derive(Clone)]
pub struct SharedStorage {
    inner: Arc<Mutex<Box<dyn Storage>>>,
}

impl SharedStorage {
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(storage))),
        }
    }

    fn with<T>(&self, f: impl FnOnce(&mut Box<dyn Storage>) -> Result<T>) -> Result<T> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| GifseekError::Storage("storage lock poisoned".to_string()))?;
        f(&mut guard)
    }
}

impl Storage for SharedStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with(|storage| storage.get(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.with(|storage| storage.set(key, value))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.with(|storage| storage.remove(key))
    }
}

impl std::fmt::Debug for SharedStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStorage").finish_non_exhaustive()
    }
}
