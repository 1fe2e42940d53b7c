//! Storage layer for persisted user data.
//!
//! This module provides the key/value persistence abstraction and the two
//! stores built on it: the favorites set and the API key override. Both share
//! one backend via [`SharedStorage`].
//!
//! # Modules
//!
//! - `backend`: Storage trait and the shared handle
//! - `json`: JSON file-based backend with atomic writes
//! - `memory`: In-memory backend
//! - `favorites`: Favorites set with toggle semantics
//! - `credentials`: Ordered API key resolution

pub mod backend;
pub mod credentials;
pub mod favorites;
pub mod json;
pub mod memory;

pub use backend::{SharedStorage, Storage};
pub use credentials::{CredentialResolver, BUILD_DEFAULT_API_KEY, CREDENTIAL_KEY};
pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use json::JsonStorage;
pub use memory::MemoryStorage;
