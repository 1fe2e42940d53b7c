//! Plain-text rendering of a [`RenderSnapshot`].
//!
//! The renderer lays the snapshot out top to bottom: header, notice, result
//! tiles (or skeleton placeholders while a fresh search loads), pagination
//! footer, and the favorites section. Tiles are numbered by their position
//! in [`RenderSnapshot::items`] so a front end can refer back to them; items
//! without a usable rendition are skipped but keep their number.
//!
//! # Example
//!
//! ```rust
//! use gifseek::app::AppState;
//! use gifseek::storage::{MemoryStorage, SharedStorage};
//! use gifseek::ui::render_to_string;
//! use gifseek::Config;
//!
//! let state = AppState::new(&Config::default(), SharedStorage::new(MemoryStorage::default()));
//! let text = render_to_string(&state.compute_snapshot());
//! assert!(text.contains("gifseek"));
//! ```

use crate::app::modes::SessionStatus;
use crate::app::AppState;
use crate::domain::CredentialSource;
use crate::ui::viewmodel::{DisplayItem, RenderSnapshot};
use std::fmt::Write;

/// Renders the current state to stdout.
pub fn render(state: &AppState) {
    print!("{}", render_to_string(&state.compute_snapshot()));
}

/// Renders a snapshot to a string.
#[must_use]
pub fn render_to_string(snapshot: &RenderSnapshot) -> String {
    let mut out = String::new();
    render_header(&mut out, snapshot);

    if let Some(notice) = &snapshot.notice {
        let _ = writeln!(out, "! {}", notice.message());
    }

    if snapshot.skeleton_count > 0 {
        render_skeleton(&mut out, snapshot.skeleton_count);
    } else {
        render_items(&mut out, &snapshot.items);
    }

    render_footer(&mut out, snapshot);

    if snapshot.favorites_enabled {
        render_favorites(&mut out, snapshot);
    }
    out
}

fn render_header(out: &mut String, snapshot: &RenderSnapshot) {
    let _ = write!(out, "gifseek");
    if !snapshot.query.is_empty() {
        let _ = write!(out, " \u{2014} \u{201c}{}\u{201d}", snapshot.query);
    }
    if snapshot.sort_enabled {
        let _ = write!(out, " [sort: {}]", snapshot.sort.as_str());
    }
    let key = match snapshot.credential_source {
        CredentialSource::Override => "session",
        CredentialSource::PersistedOverride => "saved",
        CredentialSource::EmbeddedDefault => "built-in",
        CredentialSource::Absent => "missing",
    };
    let _ = writeln!(out, " [key: {key}]");
}

fn render_skeleton(out: &mut String, count: usize) {
    for _ in 0..count {
        let _ = writeln!(out, "  \u{2591}\u{2591}\u{2591}\u{2591}\u{2591}\u{2591}\u{2591}\u{2591}");
    }
}

fn render_items(out: &mut String, items: &[DisplayItem]) {
    for (index, item) in items.iter().enumerate() {
        let Some(rendition) = &item.rendition else {
            continue;
        };
        let star = if item.is_favorite { '\u{2605}' } else { ' ' };
        let size = match (rendition.width, rendition.height) {
            (Some(w), Some(h)) => format!(" {w}x{h}"),
            _ => String::new(),
        };
        let _ = writeln!(out, "{:>3}. {star} {}{size}", index + 1, item.title);
        let _ = writeln!(out, "       {}", rendition.url);
        if !item.permalink_url.is_empty() {
            let _ = writeln!(out, "       {}", item.permalink_url);
        }
    }
}

fn render_footer(out: &mut String, snapshot: &RenderSnapshot) {
    if snapshot.status == SessionStatus::Loading {
        let _ = writeln!(out, "Loading\u{2026}");
    }
    if let Some(label) = snapshot.showing_label() {
        let _ = writeln!(out, "{label}");
    }
    if snapshot.has_more {
        let _ = writeln!(out, "(more results available)");
    }
}

fn render_favorites(out: &mut String, snapshot: &RenderSnapshot) {
    if snapshot.favorites.is_empty() {
        return;
    }
    let _ = writeln!(out, "Favorites:");
    for favorite in &snapshot.favorites {
        let _ = writeln!(out, "  \u{2605} {} {}", favorite.title, favorite.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modes::{Notice, SortMode};
    use crate::domain::{FavoriteEntry, Rendition};

    fn snapshot() -> RenderSnapshot {
        RenderSnapshot {
            status: SessionStatus::Success,
            query: "cats".into(),
            sort: SortMode::Recent,
            items: vec![
                DisplayItem {
                    id: "a".into(),
                    permalink_url: "https://giphy.com/a".into(),
                    title: "Cat A".into(),
                    rendition: Some(Rendition {
                        url: "https://media/a.gif".into(),
                        width: Some(200),
                        height: Some(150),
                    }),
                    is_favorite: true,
                },
                DisplayItem {
                    id: "b".into(),
                    permalink_url: String::new(),
                    title: "No Image".into(),
                    rendition: None,
                    is_favorite: false,
                },
            ],
            showing_range: 0..2,
            total_count: Some(10),
            has_more: true,
            favorites: vec![FavoriteEntry::new("a", "https://giphy.com/gifs/a", "Cat A")],
            notice: None,
            skeleton_count: 0,
            credential_source: CredentialSource::PersistedOverride,
            sort_enabled: true,
            favorites_enabled: true,
        }
    }

    #[test]
    fn renders_tiles_label_and_favorites() {
        let text = render_to_string(&snapshot());
        assert!(text.contains("[sort: recent]"));
        assert!(text.contains("[key: saved]"));
        assert!(text.contains("  1. \u{2605} Cat A 200x150"));
        assert!(!text.contains("No Image"));
        assert!(text.contains("Showing 1\u{2013}2 of 10"));
        assert!(text.contains("Favorites:"));
    }

    #[test]
    fn skeleton_replaces_tiles_while_loading() {
        let mut snap = snapshot();
        snap.status = SessionStatus::Loading;
        snap.skeleton_count = 6;
        snap.items.clear();
        let text = render_to_string(&snap);
        assert_eq!(text.matches('\u{2591}').count(), 48);
        assert!(text.contains("Loading"));
    }

    #[test]
    fn notice_and_disabled_features() {
        let mut snap = snapshot();
        snap.notice = Some(Notice::FetchFailed);
        snap.sort_enabled = false;
        snap.favorites_enabled = false;
        let text = render_to_string(&snap);
        assert!(text.contains("! Something went wrong"));
        assert!(!text.contains("[sort:"));
        assert!(!text.contains("Favorites:"));
    }
}
