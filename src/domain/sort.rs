//! Client-side ordering of a freshly fetched batch.
//!
//! The server's order is authoritative for relevance. For the "recent" mode the
//! batch is reordered by a recency timestamp read from each item: the first
//! non-empty of `import_datetime` and `trending_datetime`. A value that is
//! missing or cannot be parsed counts as the Unix epoch, so such items sink to
//! the end. Relative order among epoch items is not part of the contract.
//!
//! Projection only ever applies to the page just fetched. Pages already shown
//! are never reshuffled; a sort change re-fetches from offset 0 instead.

use crate::domain::item::{ResultBatch, ResultItem};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Datetime layout used by the search API (`2013-03-21 04:06:29`), read as UTC.
const API_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Active ordering for result pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Server order.
    #[default]
    Relevance,
    /// Most recently imported first.
    Recent,
}

impl SortMode {
    /// Parses a user-supplied mode name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "relevance" | "relevant" => Some(Self::Relevance),
            "recent" => Some(Self::Recent),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Recent => "recent",
        }
    }
}

/// Returns the recency timestamp of an item in Unix seconds.
///
/// # Examples
///
/// ```
/// use gifseek::domain::{sort::recency_timestamp, ResultItem};
///
/// let item = ResultItem {
///     id: "a".into(),
///     permalink_url: String::new(),
///     title: None,
///     renditions: vec![],
///     import_datetime: Some("1970-01-01 00:01:40".into()),
///     trending_datetime: None,
/// };
/// assert_eq!(recency_timestamp(&item), 100);
/// ```
#[must_use]
pub fn recency_timestamp(item: &ResultItem) -> i64 {
    let raw = [&item.import_datetime, &item.trending_datetime]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty());

    raw.and_then(parse_datetime).unwrap_or(0)
}

fn parse_datetime(raw: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(raw, API_DATETIME_FORMAT)
        .map(|naive| naive.and_utc().timestamp())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.timestamp()))
        .ok()
}

/// Reorders a batch for the given sort mode.
#[must_use]
pub fn project(mut batch: ResultBatch, mode: SortMode) -> ResultBatch {
    match mode {
        SortMode::Relevance => batch,
        SortMode::Recent => {
            let _span = tracing::debug_span!("project_recent", items = batch.items.len()).entered();
            batch
                .items
                .sort_by_cached_key(|item| std::cmp::Reverse(recency_timestamp(item)));
            batch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::PageMeta;

    fn item(id: &str, imported: Option<&str>, trending: Option<&str>) -> ResultItem {
        ResultItem {
            id: id.to_string(),
            permalink_url: format!("https://giphy.com/{id}"),
            title: None,
            renditions: vec![],
            import_datetime: imported.map(String::from),
            trending_datetime: trending.map(String::from),
        }
    }

    fn batch(items: Vec<ResultItem>) -> ResultBatch {
        let count = items.len() as u64;
        ResultBatch {
            items,
            meta: PageMeta { count_returned: count, total_count: None },
        }
    }

    fn ids(batch: &ResultBatch) -> Vec<&str> {
        batch.items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn relevance_is_identity() {
        let input = batch(vec![
            item("a", Some("2015-01-01 00:00:00"), None),
            item("b", Some("2020-01-01 00:00:00"), None),
            item("c", None, None),
        ]);
        let output = project(input.clone(), SortMode::Relevance);
        assert_eq!(output, input);
    }

    #[test]
    fn recent_orders_newest_first() {
        let input = batch(vec![
            item("old", Some("2014-06-01 10:00:00"), None),
            item("new", Some("2021-02-03 04:05:06"), None),
            item("mid", None, Some("2018-01-01 00:00:00")),
        ]);
        let output = project(input, SortMode::Recent);
        assert_eq!(ids(&output), vec!["new", "mid", "old"]);
    }

    #[test]
    fn undated_items_sort_after_dated_ones() {
        let input = batch(vec![
            item("none", None, None),
            item("dated", Some("2016-01-01 00:00:00"), None),
            item("zero", Some("0000-00-00 00:00:00"), None),
        ]);
        let output = project(input, SortMode::Recent);
        assert_eq!(output.items[0].id, "dated");
    }

    #[test]
    fn import_datetime_takes_precedence() {
        let entry = item("a", Some("2016-01-01 00:00:00"), Some("2020-01-01 00:00:00"));
        assert_eq!(recency_timestamp(&entry), 1_451_606_400);
    }

    #[test]
    fn unparseable_first_field_does_not_fall_through() {
        let entry = item("a", Some("not a date"), Some("2020-01-01 00:00:00"));
        assert_eq!(recency_timestamp(&entry), 0);
    }

    #[test]
    fn rfc3339_is_accepted() {
        let entry = item("a", Some("1970-01-01T00:00:10Z"), None);
        assert_eq!(recency_timestamp(&entry), 10);
    }

    #[test]
    fn parse_mode_names() {
        assert_eq!(SortMode::parse("Recent"), Some(SortMode::Recent));
        assert_eq!(SortMode::parse(" relevance "), Some(SortMode::Relevance));
        assert_eq!(SortMode::parse("oldest"), None);
    }
}
