//! Search-wide constants and query normalization.

use std::time::Duration;

/// How long the search box must stay unchanged before a query is issued.
pub const SEARCH_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Number of entries shown in the trending list.
pub const TRENDING_LIMIT: usize = 5;

/// Trim a raw search-box value into the query sent to the catalog and used
/// as the trending key. An empty result selects browse mode.
pub fn normalize_query(raw: &str) -> &str {
    raw.trim()
}

/// Whether `query` selects the "popular" browse listing instead of a search.
pub fn is_browse(query: &str) -> bool {
    normalize_query(query).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_surrounding_whitespace() {
        assert_eq!(normalize_query("  batman \n"), "batman");
        assert_eq!(normalize_query("the dark knight"), "the dark knight");
    }

    #[test]
    fn whitespace_only_is_browse() {
        assert!(is_browse(""));
        assert!(is_browse("   "));
        assert!(!is_browse(" a "));
    }
}
