//! Catalog and trending data types.
//!
//! [`Movie`] and [`MoviePage`] mirror the catalog's JSON payloads and are
//! passed through to the view untouched. [`SearchEntry`] is the persisted
//! trending tally, serialized with the document store's attribute names.

use serde::{Deserialize, Serialize};

/// Placeholder shown when a catalog field is missing or zero.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Movie
// ---------------------------------------------------------------------------

/// A single movie as returned by the catalog.
///
/// Unknown fields are ignored; optional fields default so that sparse
/// discovery results still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Catalog identifier.
    pub id: i64,
    #[serde(default)]
    pub title: String,
    /// Relative image path, e.g. `/abc123.jpg`.
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub popularity: f64,
    /// `YYYY-MM-DD`, sometimes an empty string.
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub overview: String,
}

impl Movie {
    /// Full poster URL under `image_base`, or `None` when the movie has no
    /// poster.
    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", image_base.trim_end_matches('/'), path))
    }

    /// Four-digit release year, if the release date carries one.
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
    }

    /// Average vote with one decimal, or [`NOT_AVAILABLE`] for unrated movies.
    pub fn rating_label(&self) -> String {
        if self.vote_average > 0.0 {
            format!("{:.1}", self.vote_average)
        } else {
            NOT_AVAILABLE.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// MoviePage
// ---------------------------------------------------------------------------

/// Body of a catalog listing response.
///
/// Besides the results, the catalog may flag a logical failure inside an
/// otherwise successful HTTP response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub page: Option<u32>,
    /// `null` and a missing array both mean "no results".
    #[serde(default)]
    pub results: Option<Vec<Movie>>,
    #[serde(default)]
    pub total_results: Option<u64>,
    /// Payload-level success flag; `Some(false)` marks a failed request.
    #[serde(default)]
    pub success: Option<bool>,
    /// Legacy spelling of the same flag, reported by some deployments.
    #[serde(default, rename = "Response")]
    pub response: Option<bool>,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl MoviePage {
    /// Whether the payload reports a provider-side failure.
    pub fn is_failure(&self) -> bool {
        self.success == Some(false) || self.response == Some(false)
    }

    /// Provider-supplied failure message, if any.
    pub fn failure_message(&self) -> Option<&str> {
        self.status_message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
    }

    /// Consume the page, yielding its results (empty when absent).
    pub fn into_results(self) -> Vec<Movie> {
        self.results.unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// SearchEntry
// ---------------------------------------------------------------------------

/// Persisted tally of how often a search term produced results.
///
/// Field names match the document collection's attributes; `$id` is the
/// store-generated document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "SearchTerm")]
    pub search_term: String,
    pub count: i64,
    pub movie_id: i64,
    #[serde(default)]
    pub poster_url: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
