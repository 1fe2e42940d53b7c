//! Persisted favorites set.
//!
//! Favorites are stored as one JSON array under a single key. The list is read
//! lazily on first access and cached; every mutation writes the whole list
//! back before returning. A stored value that cannot be read or parsed is
//! treated as an empty set and is overwritten by the next toggle.

use crate::domain::error::{GifseekError, Result};
use crate::domain::FavoriteEntry;
use crate::storage::backend::Storage;
use std::cell::RefCell;

/// Storage key holding the serialized favorites list.
pub const FAVORITES_KEY: &str = "favorites";

/// Deduplicated, insertion-ordered set of favorite results keyed by id.
///
/// # Examples
///
/// ```
/// use gifseek::domain::FavoriteEntry;
/// use gifseek::storage::{FavoritesStore, MemoryStorage};
///
/// let mut favorites = FavoritesStore::new(Box::new(MemoryStorage::default()));
/// let entry = FavoriteEntry::new("a", "https://giphy.com/a", "Cat");
///
/// assert!(favorites.toggle(entry.clone())?);
/// assert!(favorites.is_favorite("a"));
/// assert!(!favorites.toggle(entry)?);
/// assert!(favorites.list().is_empty());
/// # Ok::<(), gifseek::GifseekError>(())
/// ```
pub struct FavoritesStore {
    storage: Box<dyn Storage>,
    cache: RefCell<Option<Vec<FavoriteEntry>>>,
}

impl FavoritesStore {
    /// Creates a store over `storage`. Nothing is read until first access.
    #[must_use]
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            storage,
            cache: RefCell::new(None),
        }
    }

    /// Returns all favorites in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<FavoriteEntry> {
        self.ensure_loaded();
        self.cache.borrow().clone().unwrap_or_default()
    }

    /// Returns `true` if an entry with `id` is in the set.
    #[must_use]
    pub fn is_favorite(&self, id: &str) -> bool {
        self.ensure_loaded();
        self.cache
            .borrow()
            .as_ref()
            .is_some_and(|entries| entries.iter().any(|e| e.id == id))
    }

    /// Adds `entry` if its id is absent, otherwise removes the stored entry.
    ///
    /// Returns the new membership state. The in-memory set only changes once
    /// the write has succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`GifseekError::Storage`] if the updated list cannot be written.
    pub fn toggle(&mut self, entry: FavoriteEntry) -> Result<bool> {
        let _span = tracing::debug_span!("favorites_toggle", id = %entry.id).entered();

        let mut entries = self.list();
        let is_member = if let Some(pos) = entries.iter().position(|e| e.id == entry.id) {
            entries.remove(pos);
            false
        } else {
            entries.push(entry);
            true
        };

        let json = serde_json::to_string(&entries)
            .map_err(|e| GifseekError::Storage(format!("failed to serialize favorites: {e}")))?;
        self.storage.set(FAVORITES_KEY, &json)?;
        *self.cache.borrow_mut() = Some(entries);

        tracing::debug!(is_member, "favorite toggled");
        Ok(is_member)
    }

    fn ensure_loaded(&self) {
        if self.cache.borrow().is_some() {
            return;
        }
        let entries = self.load();
        *self.cache.borrow_mut() = Some(entries);
    }

    fn load(&self) -> Vec<FavoriteEntry> {
        let raw = match self.storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "favorites unreadable, starting empty");
                return Vec::new();
            }
        };

        let parsed: Vec<FavoriteEntry> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "favorites malformed, starting empty");
                return Vec::new();
            }
        };

        // Older writers may have left duplicate ids behind; the first one wins.
        let mut entries: Vec<FavoriteEntry> = Vec::with_capacity(parsed.len());
        for entry in parsed {
            if !entries.iter().any(|e| e.id == entry.id) {
                entries.push(entry);
            }
        }
        tracing::debug!(count = entries.len(), "favorites loaded");
        entries
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
