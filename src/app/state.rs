//! Search session state and snapshot computation.
//!
//! This module defines [`SearchSession`], the mutable record of the current
//! query, pagination cursor, sort mode, and status, and [`AppState`], which
//! owns the session together with the favorites store and credential
//! resolver. [`AppState`] is the single source of truth for everything the
//! presentation layer shows.
//!
//! # Invariants
//!
//! - `offset` never decreases while the query and sort stay the same. It is
//!   reset to 0 whenever a fresh search starts (new query, sort change, reset).
//! - Sort projection applies to each fetched page on arrival. Accumulated pages
//!   are never reordered.
//! - `generation` increases on every fresh search and reset. Responses tagged
//!   with an older generation are ignored.
//!
//! # Example
//!
//! ```rust
//! use gifseek::app::AppState;
//! use gifseek::storage::{MemoryStorage, SharedStorage};
//! use gifseek::Config;
//!
//! let state = AppState::new(&Config::default(), SharedStorage::new(MemoryStorage::default()));
//! let snapshot = state.compute_snapshot();
//! assert!(snapshot.items.is_empty());
//! ```

use super::modes::{Notice, SessionStatus, SortMode};
use crate::domain::{pagination, sort, ResultBatch, ResultItem};
use crate::storage::{CredentialResolver, FavoritesStore, SharedStorage};
use crate::ui::viewmodel::{DisplayItem, RenderSnapshot};
use crate::worker::FetchRequest;
use crate::Config;
use std::ops::Range;

/// Query, cursor, and results of the active search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    /// Current trimmed query; empty before the first search and after reset.
    pub query: String,

    /// Page size requested from the server.
    pub limit: u32,

    /// Number of results retrieved so far for `query` and `sort`.
    pub offset: u64,

    /// Active ordering for incoming pages.
    pub sort: SortMode,

    /// Server-reported total, `None` when unknown.
    pub total_count: Option<u64>,

    /// Lifecycle status.
    pub status: SessionStatus,

    /// Accumulated results across pages, each page in projected order.
    pub items: Vec<ResultItem>,

    /// Whether another page can be requested.
    pub has_more: bool,

    /// Offsets covered by the most recently applied page.
    pub showing_range: Range<u64>,

    /// Message to surface with the results.
    pub notice: Option<Notice>,

    /// Request tag for discarding superseded responses.
    pub generation: u64,

    /// Whether the in-flight request extends the results.
    pub pending_append: bool,
}

impl SearchSession {
    /// Creates an idle session with the given page size.
    #[must_use]
    pub const fn new(limit: u32) -> Self {
        Self {
            query: String::new(),
            limit,
            offset: 0,
            sort: SortMode::Relevance,
            total_count: None,
            status: SessionStatus::Idle,
            items: Vec::new(),
            has_more: false,
            showing_range: 0..0,
            notice: None,
            generation: 0,
            pending_append: false,
        }
    }

    /// Starts a fresh search for `query`, clearing results and the cursor.
    ///
    /// Leaves the session in `Loading` with a new generation.
    pub fn begin_fresh(&mut self, query: String) {
        self.query = query;
        self.clear_results();
        self.generation += 1;
        self.status = SessionStatus::Loading;
        self.pending_append = false;
        self.notice = None;
    }

    /// Marks a "load more" request as in flight.
    pub fn begin_append(&mut self) {
        self.status = SessionStatus::Loading;
        self.pending_append = true;
        self.notice = None;
    }

    /// Returns to `Idle` with no query, no results, and a new generation.
    pub fn reset(&mut self) {
        self.query.clear();
        self.clear_results();
        self.generation += 1;
        self.status = SessionStatus::Idle;
        self.pending_append = false;
        self.notice = None;
    }

    fn clear_results(&mut self) {
        self.items.clear();
        self.offset = 0;
        self.total_count = None;
        self.has_more = false;
        self.showing_range = 0..0;
    }

    /// Builds the request for the page at the current offset.
    #[must_use]
    pub fn fetch_request(&self, api_key: &str) -> FetchRequest {
        FetchRequest {
            generation: self.generation,
            query: self.query.clone(),
            limit: self.limit,
            offset: self.offset,
            append: self.pending_append,
            api_key: api_key.to_string(),
        }
    }

    /// Applies a fetched page.
    ///
    /// Projects the page for the active sort, replaces or extends the results,
    /// advances the cursor, and recomputes `has_more`.
    pub fn apply_page(&mut self, batch: ResultBatch, append: bool) {
        let ResultBatch { items, meta } = sort::project(batch, self.sort);
        let previous_offset = self.offset;

        let is_empty_fresh = !append && items.is_empty();
        if append {
            self.items.extend(items);
        } else {
            self.items = items;
        }

        if is_empty_fresh {
            self.status = SessionStatus::Empty;
            self.notice = Some(Notice::NoResults {
                query: self.query.clone(),
            });
        } else {
            self.status = SessionStatus::Success;
            self.notice = None;
        }

        self.offset = self.offset.saturating_add(meta.count_returned);
        self.total_count = meta.total_count;
        self.has_more = pagination::has_more(
            self.offset,
            self.total_count,
            meta.count_returned,
            self.limit,
        );
        self.showing_range = previous_offset..self.offset;
        self.pending_append = false;

        tracing::debug!(
            status = ?self.status,
            offset = self.offset,
            total = ?self.total_count,
            has_more = self.has_more,
            items = self.items.len(),
            "page applied"
        );
    }

    /// Records a failed page request.
    ///
    /// Results from earlier pages are kept; a fresh search already cleared them
    /// when it started.
    pub fn apply_failure(&mut self) {
        self.status = SessionStatus::Error;
        self.notice = Some(Notice::FetchFailed);
        self.has_more = false;
        self.pending_append = false;
    }
}

/// Feature switches that used to be separate builds of the same page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Features {
    pub enable_favorites: bool,
    pub enable_sort: bool,
    pub skeleton_count: usize,
}

/// Central application state container.
///
/// Mutated by [`handle_event`](crate::app::handle_event) only.
#[derive(Debug)]
pub struct AppState {
    /// The active search.
    pub session: SearchSession,

    /// Persisted favorites.
    pub favorites: FavoritesStore,

    /// API key sources.
    pub credentials: CredentialResolver,

    /// Enabled features.
    pub features: Features,

    /// Query used by the quick search shortcut.
    pub quick_query: String,
}

impl AppState {
    /// Creates an idle state over `storage`.
    ///
    /// The favorites store and credential resolver share the backend.
    #[must_use]
    pub fn new(config: &Config, storage: SharedStorage) -> Self {
        Self {
            session: SearchSession::new(config.limit),
            favorites: FavoritesStore::new(Box::new(storage.clone())),
            credentials: CredentialResolver::new(Box::new(storage), config.embedded_api_key()),
            features: Features {
                enable_favorites: config.enable_favorites,
                enable_sort: config.enable_sort,
                skeleton_count: config.effective_skeleton_count(),
            },
            quick_query: config.quick_query.clone(),
        }
    }

    /// Computes an immutable, display-ready snapshot of the current state.
    #[must_use]
    pub fn compute_snapshot(&self) -> RenderSnapshot {
        let session = &self.session;
        let favorites = if self.features.enable_favorites {
            self.favorites.list()
        } else {
            Vec::new()
        };

        let items = session
            .items
            .iter()
            .map(|item| DisplayItem {
                id: item.id.clone(),
                permalink_url: item.permalink_url.clone(),
                title: item.display_title().to_string(),
                rendition: item.best_rendition().cloned(),
                is_favorite: favorites.iter().any(|f| f.id == item.id),
            })
            .collect();

        let skeleton_count = if session.status.is_loading() && !session.pending_append {
            self.features.skeleton_count
        } else {
            0
        };

        RenderSnapshot {
            status: session.status,
            query: session.query.clone(),
            sort: session.sort,
            items,
            showing_range: session.showing_range.clone(),
            total_count: session.total_count,
            has_more: session.has_more,
            favorites,
            notice: session.notice.clone(),
            skeleton_count,
            credential_source: self.credentials.resolve().source(),
            sort_enabled: self.features.enable_sort,
            favorites_enabled: self.features.enable_favorites,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageMeta;

    fn item(id: &str, imported: &str) -> ResultItem {
        ResultItem {
            id: id.to_string(),
            permalink_url: format!("https://giphy.com/{id}"),
            title: None,
            renditions: vec![],
            import_datetime: Some(imported.to_string()),
            trending_datetime: None,
        }
    }

    fn page(ids: &[(&str, &str)], count: u64, total: Option<u64>) -> ResultBatch {
        ResultBatch {
            items: ids.iter().map(|(id, at)| item(id, at)).collect(),
            meta: PageMeta {
                count_returned: count,
                total_count: total,
            },
        }
    }

    #[test]
    fn begin_fresh_resets_cursor_and_bumps_generation() {
        let mut session = SearchSession::new(24);
        session.offset = 48;
        session.total_count = Some(100);
        session.items.push(item("old", "2020-01-01 00:00:00"));
        session.begin_fresh("cats".into());
        assert_eq!(session.offset, 0);
        assert_eq!(session.total_count, None);
        assert!(session.items.is_empty());
        assert_eq!(session.generation, 1);
        assert_eq!(session.status, SessionStatus::Loading);
    }

    #[test]
    fn append_projects_only_the_new_page() {
        let mut session = SearchSession::new(2);
        session.sort = SortMode::Recent;
        session.begin_fresh("cats".into());
        session.apply_page(
            page(&[("a", "2010-01-01 00:00:00"), ("b", "2012-01-01 00:00:00")], 2, None),
            false,
        );
        session.begin_append();
        session.apply_page(
            page(&[("c", "2005-01-01 00:00:00"), ("d", "2020-01-01 00:00:00")], 2, None),
            true,
        );
        let ids: Vec<&str> = session.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "d", "c"]);
        assert_eq!(session.offset, 4);
        assert_eq!(session.showing_range, 2..4);
        assert!(session.has_more);
    }

    #[test]
    fn empty_append_is_success_not_empty() {
        let mut session = SearchSession::new(24);
        session.begin_fresh("cats".into());
        session.apply_page(page(&[("a", "")], 1, None), false);
        session.begin_append();
        session.apply_page(page(&[], 0, None), true);
        assert_eq!(session.status, SessionStatus::Success);
        assert!(!session.has_more);
        assert_eq!(session.items.len(), 1);
    }

    #[test]
    fn failure_keeps_items() {
        let mut session = SearchSession::new(24);
        session.begin_fresh("cats".into());
        session.apply_page(page(&[("a", "")], 1, Some(10)), false);
        session.begin_append();
        session.apply_failure();
        assert_eq!(session.status, SessionStatus::Error);
        assert_eq!(session.items.len(), 1);
        assert!(!session.has_more);
        assert_eq!(session.offset, 1);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut session = SearchSession::new(24);
        session.begin_fresh("cats".into());
        session.apply_page(page(&[("a", "")], 1, Some(10)), false);
        session.reset();
        assert_eq!(session.status, SessionStatus::Idle);
        assert!(session.query.is_empty());
        assert!(session.items.is_empty());
        assert_eq!(session.generation, 2);
    }
}
