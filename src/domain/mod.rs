//! Domain layer for gifseek.
//!
//! This module contains the core domain types and the two pure policies the
//! session controller relies on, independent of storage, transport, or
//! presentation concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`item`]: Result items, pages, favorites, and response decoding
//! - [`credential`]: Resolved API key with provenance
//! - [`sort`]: Recency projection of a fetched batch
//! - [`pagination`]: "More results available" policy
//!
//! # Examples
//!
//! ```
//! use gifseek::domain::{sort, ResultBatch, SortMode};
//!
//! let batch = ResultBatch::from_body(r#"{"data":[]}"#)?;
//! let projected = sort::project(batch, SortMode::Recent);
//! assert!(projected.items.is_empty());
//! # Ok::<(), gifseek::GifseekError>(())
//! ```

pub mod credential;
pub mod error;
pub mod item;
pub mod pagination;
pub mod sort;

pub use credential::{Credential, CredentialSource};
pub use error::{GifseekError, Result};
pub use item::{FavoriteEntry, PageMeta, Rendition, ResultBatch, ResultItem};
pub use sort::SortMode;
