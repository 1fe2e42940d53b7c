//! Decides whether another page can be requested.
//!
//! When the server reports a total, more pages exist while the offset is below
//! it and the last page was not empty. Without a total the only signal is page
//! fullness: a full page suggests more, a short page signals the end. That
//! heuristic shows "more" after a final page that happens to be exactly `limit`
//! long, and it is kept as-is.

/// Returns `true` if the "load more" affordance should be offered.
///
/// # Examples
///
/// ```
/// use gifseek::domain::pagination::has_more;
///
/// assert!(has_more(24, Some(100), 24, 24));
/// assert!(!has_more(100, Some(100), 4, 24));
/// assert!(has_more(24, None, 24, 24));
/// assert!(!has_more(30, None, 6, 24));
/// ```
#[must_use]
pub const fn has_more(
    offset_after_page: u64,
    total_count: Option<u64>,
    count_returned: u64,
    limit: u32,
) -> bool {
    match total_count {
        Some(total) => offset_after_page < total && count_returned > 0,
        None => count_returned >= limit as u64,
    }
}
