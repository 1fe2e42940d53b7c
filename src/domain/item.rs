//! Search result domain model and response decoding.
//!
//! A page returned by the search endpoint is decoded into a [`ResultBatch`]:
//! an ordered list of [`ResultItem`]s plus [`PageMeta`]. Decoding is tolerant.
//! A missing or non-array `data` field is an empty page, absent pagination
//! fields fall back to defaults, and individual entries that cannot be read are
//! skipped. Only a body that is not JSON at all is an error.

use crate::domain::error::{GifseekError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rendition keys in order of preference for display.
pub const RENDITION_PREFERENCE: [&str; 4] = [
    "fixed_width_downsampled",
    "fixed_width",
    "downsized",
    "original",
];

/// One encoded size of a result image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendition {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A single search hit.
///
/// `renditions` is ordered by display preference (see [`RENDITION_PREFERENCE`]).
/// The two datetime fields are kept raw; only the recency sort reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub id: String,
    pub permalink_url: String,
    pub title: Option<String>,
    pub renditions: Vec<Rendition>,
    pub import_datetime: Option<String>,
    pub trending_datetime: Option<String>,
}

impl ResultItem {
    /// Returns the most preferred rendition, if the item has any.
    #[must_use]
    pub fn best_rendition(&self) -> Option<&Rendition> {
        self.renditions.first()
    }

    /// Returns the title, or `"Untitled"` when the upstream title is absent or blank.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(UNTITLED)
    }
}

/// Fallback label for results and favorites without a title.
pub const UNTITLED: &str = "Untitled";

/// Pagination metadata reported alongside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMeta {
    /// Number of items the server says it returned for this page.
    pub count_returned: u64,
    /// Total matches for the query, `None` when the server did not report one.
    pub total_count: Option<u64>,
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultBatch {
    pub items: Vec<ResultItem>,
    pub meta: PageMeta,
}

impl ResultBatch {
    /// Decodes a search response body.
    ///
    /// `count_returned` defaults to the number of decoded entries in `data`
    /// (before any are skipped as unreadable) and `total_count` defaults to
    /// unknown.
    ///
    /// # Errors
    ///
    /// Returns [`GifseekError::Parse`] if the body is not valid JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use gifseek::domain::ResultBatch;
    ///
    /// let body = r#"{"data":[{"id":"a","url":"https://giphy.com/a",
    ///     "images":{"fixed_width":{"url":"u1"}}}],
    ///     "pagination":{"count":1,"total_count":1}}"#;
    /// let batch = ResultBatch::from_body(body)?;
    /// assert_eq!(batch.items[0].id, "a");
    /// assert_eq!(batch.meta.total_count, Some(1));
    /// # Ok::<(), gifseek::GifseekError>(())
    /// ```
    pub fn from_body(body: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(body)
            .map_err(|e| GifseekError::Parse(format!("response is not JSON: {e}")))?;
        Ok(Self::from_json(&json))
    }

    /// Decodes an already-parsed response document.
    #[must_use]
    pub fn from_json(json: &Value) -> Self {
        let raw = json
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let items: Vec<ResultItem> = raw.iter().filter_map(decode_item).collect();

        if items.len() != raw.len() {
            tracing::debug!(
                skipped = raw.len() - items.len(),
                "skipped unreadable result entries"
            );
        }

        let pagination = json.get("pagination");
        let count_returned = pagination
            .and_then(|p| p.get("count"))
            .and_then(Value::as_u64)
            .unwrap_or(raw.len() as u64);
        let total_count = pagination
            .and_then(|p| p.get("total_count"))
            .and_then(Value::as_u64);

        Self {
            items,
            meta: PageMeta {
                count_returned,
                total_count,
            },
        }
    }
}

#[derive(Deserialize)]
struct RawItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    images: Option<serde_json::Map<String, Value>>,
    #[serde(default)]
    import_datetime: Option<String>,
    #[serde(default)]
    trending_datetime: Option<String>,
}

fn decode_item(value: &Value) -> Option<ResultItem> {
    let raw = RawItem::deserialize(value).ok()?;
    let id = raw.id.filter(|id| !id.is_empty())?;

    let images = raw.images.unwrap_or_default();
    let renditions = RENDITION_PREFERENCE
        .iter()
        .filter_map(|key| images.get(*key))
        .filter_map(decode_rendition)
        .collect();

    Some(ResultItem {
        id,
        permalink_url: raw.url.unwrap_or_default(),
        title: raw.title,
        renditions,
        import_datetime: raw.import_datetime,
        trending_datetime: raw.trending_datetime,
    })
}

fn decode_rendition(value: &Value) -> Option<Rendition> {
    let url = value.get("url")?.as_str().filter(|u| !u.is_empty())?;
    Some(Rendition {
        url: url.to_string(),
        width: value.get("width").and_then(lenient_dimension),
        height: value.get("height").and_then(lenient_dimension),
    })
}

/// Dimensions arrive as decimal strings (`"200"`) or numbers.
fn lenient_dimension(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A result the user marked as a favorite.
///
/// Keyed by `id` inside [`FavoritesStore`](crate::storage::FavoritesStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub id: String,
    /// Permalink to the item's page on the provider site.
    pub url: String,
    pub title: String,
}

impl FavoriteEntry {
    /// Creates a new favorite entry.
    pub fn new(id: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_single_item_page() {
        let body = json!({
            "data": [{"id": "a", "title": "X", "images": {"fixed_width": {"url": "u1"}}}],
            "pagination": {"count": 1, "total_count": 1}
        });
        let batch = ResultBatch::from_json(&body);
        assert_eq!(batch.items.len(), 1);
        assert_eq!(batch.items[0].id, "a");
        assert_eq!(batch.items[0].best_rendition().map(|r| r.url.as_str()), Some("u1"));
        assert_eq!(batch.meta, PageMeta { count_returned: 1, total_count: Some(1) });
    }

    #[test]
    fn missing_data_is_empty_page() {
        let batch = ResultBatch::from_json(&json!({"meta": {"status": 200}}));
        assert!(batch.items.is_empty());
        assert_eq!(batch.meta.count_returned, 0);
        assert_eq!(batch.meta.total_count, None);
    }

    #[test]
    fn non_array_data_is_empty_page() {
        let batch = ResultBatch::from_json(&json!({"data": {"id": "a"}}));
        assert!(batch.items.is_empty());
    }

    #[test]
    fn count_defaults_to_list_length() {
        let body = json!({"data": [{"id": "a"}, {"id": "b"}]});
        let batch = ResultBatch::from_json(&body);
        assert_eq!(batch.meta.count_returned, 2);
        assert_eq!(batch.meta.total_count, None);
    }

    #[test]
    fn renditions_follow_preference_order() {
        let body = json!({"data": [{
            "id": "a",
            "images": {
                "original": {"url": "orig", "width": "480", "height": "270"},
                "fixed_width": {"url": "fw", "width": 200, "height": "113"},
                "downsized": {"url": ""}
            }
        }]});
        let batch = ResultBatch::from_json(&body);
        let renditions = &batch.items[0].renditions;
        assert_eq!(renditions.len(), 2);
        assert_eq!(renditions[0].url, "fw");
        assert_eq!(renditions[0].width, Some(200));
        assert_eq!(renditions[0].height, Some(113));
        assert_eq!(renditions[1].url, "orig");
    }

    #[test]
    fn entries_without_id_are_skipped() {
        let body = json!({"data": [{"title": "no id"}, "junk", {"id": "b"}]});
        let batch = ResultBatch::from_json(&body);
        assert_eq!(batch.items.len(), 1);
        assert_eq!(batch.items[0].id, "b");
        assert_eq!(batch.meta.count_returned, 3);
    }

    #[test]
    fn invalid_json_body_is_error() {
        let err = ResultBatch::from_body("<html>").unwrap_err();
        assert!(matches!(err, GifseekError::Parse(_)));
    }
}
