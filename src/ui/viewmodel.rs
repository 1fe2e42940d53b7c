//! View model types representing renderable session state.
//!
//! A [`RenderSnapshot`] is an immutable, display-ready copy of everything a
//! front end needs: status, results with their chosen rendition, favorites,
//! the pagination label inputs, and the notice to surface. It is computed by
//! [`AppState::compute_snapshot`](crate::app::AppState::compute_snapshot) and
//! contains no business logic.

use crate::app::modes::{Notice, SessionStatus, SortMode};
use crate::domain::{CredentialSource, FavoriteEntry, Rendition};
use std::ops::Range;

/// Complete view model of the search session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    /// Lifecycle status.
    pub status: SessionStatus,

    /// Current query, empty when idle.
    pub query: String,

    /// Active sort mode.
    pub sort: SortMode,

    /// Accumulated results in display order.
    pub items: Vec<DisplayItem>,

    /// Offsets covered by the most recently applied page.
    pub showing_range: Range<u64>,

    /// Server-reported total, `None` when unknown.
    pub total_count: Option<u64>,

    /// Whether the "load more" control should be offered.
    pub has_more: bool,

    /// Persisted favorites, empty when the feature is disabled.
    pub favorites: Vec<FavoriteEntry>,

    /// Message to show alongside the results.
    pub notice: Option<Notice>,

    /// Number of placeholder tiles to draw while a fresh search loads.
    pub skeleton_count: usize,

    /// Where the active API key comes from.
    pub credential_source: CredentialSource,

    /// Whether the sort control should be offered.
    pub sort_enabled: bool,

    /// Whether favorite controls should be offered.
    pub favorites_enabled: bool,
}

impl RenderSnapshot {
    /// Pagination label, e.g. `Showing 1–24 of 120`.
    ///
    /// Positions are 1-based and inclusive: the page covering offsets
    /// `0..24` reads `1–24`, not the raw `0–24`.
    ///
    /// Returns `None` before any page has been applied or when the last page
    /// was empty.
    #[must_use]
    pub fn showing_label(&self) -> Option<String> {
        if self.showing_range.is_empty() {
            return None;
        }
        let first = self.showing_range.start + 1;
        let last = self.showing_range.end;
        Some(match self.total_count {
            Some(total) => format!("Showing {first}\u{2013}{last} of {total}"),
            None => format!("Showing {first}\u{2013}{last}"),
        })
    }
}

/// Display information for a single result tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub id: String,

    /// Link to the item's page on the provider site.
    pub permalink_url: String,

    /// Title, or a placeholder when the item has none.
    pub title: String,

    /// Best available rendition. Tiles without one are not drawn.
    pub rendition: Option<Rendition>,

    pub is_favorite: bool,
}

impl DisplayItem {
    /// The favorite record this tile toggles, if the tile is drawn at all.
    ///
    /// The saved link is the item's page on the provider site, not the media file.
    #[must_use]
    pub fn favorite_entry(&self) -> Option<FavoriteEntry> {
        self.rendition.as_ref().map(|_| {
            FavoriteEntry::new(self.id.clone(), self.permalink_url.clone(), self.title.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(range: Range<u64>, total: Option<u64>) -> RenderSnapshot {
        RenderSnapshot {
            status: SessionStatus::Success,
            query: "cats".into(),
            sort: SortMode::Relevance,
            items: vec![],
            showing_range: range,
            total_count: total,
            has_more: false,
            favorites: vec![],
            notice: None,
            skeleton_count: 0,
            credential_source: CredentialSource::EmbeddedDefault,
            sort_enabled: true,
            favorites_enabled: true,
        }
    }

    #[test]
    fn label_is_one_based() {
        assert_eq!(
            snapshot(24..48, Some(120)).showing_label().as_deref(),
            Some("Showing 25\u{2013}48 of 120")
        );
    }

    #[test]
    fn label_without_total() {
        assert_eq!(
            snapshot(0..1, None).showing_label().as_deref(),
            Some("Showing 1\u{2013}1")
        );
    }

    #[test]
    fn no_label_for_empty_range() {
        assert_eq!(snapshot(0..0, Some(0)).showing_label(), None);
    }

    #[test]
    fn favorite_entry_links_to_permalink_and_needs_rendition() {
        let mut item = DisplayItem {
            id: "a".into(),
            permalink_url: "https://giphy.com/a".into(),
            title: "A".into(),
            rendition: None,
            is_favorite: false,
        };
        assert_eq!(item.favorite_entry(), None);

        item.rendition = Some(Rendition {
            url: "https://media/a.gif".into(),
            width: Some(200),
            height: None,
        });
        assert_eq!(
            item.favorite_entry(),
            Some(FavoriteEntry::new("a", "https://giphy.com/a", "A"))
        );
    }
}
