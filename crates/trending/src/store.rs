//! Trending search tally.
//!
//! [`TrendingStore`] keeps one [`SearchEntry`] per search term that ever
//! produced results and ranks them by how often they were searched.
//!
//! Recording is a look-up followed by a create or an update. The two steps
//! are not atomic: concurrent recordings of the same term may both create an
//! entry, or both write the same incremented count. The hazard is accepted
//! here; closing it needs a server-side increment or an optimistic retry.

use std::sync::Arc;

use marquee_core::search::normalize_query;
use marquee_core::{Movie, SearchEntry};
use serde_json::{json, Value};

use crate::collection::{DocumentCollection, DocumentQuery, StoreError};

/// Attribute holding the exact search term.
pub const SEARCH_TERM_ATTRIBUTE: &str = "SearchTerm";

/// Attribute holding the search count.
pub const COUNT_ATTRIBUTE: &str = "count";

/// What a successful recording did to the tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// First recording of this term.
    Created(SearchEntry),
    /// Existing entry `id` now holds `count`.
    Incremented { id: String, count: i64 },
    /// Empty terms are never tallied.
    Skipped,
}

/// Upsert-and-increment tally over a [`DocumentCollection`].
#[derive(Clone)]
pub struct TrendingStore {
    collection: Arc<dyn DocumentCollection>,
    image_base: String,
}

impl TrendingStore {
    /// `image_base` is prefixed to a movie's poster path for the poster
    /// snapshot, e.g. `https://image.tmdb.org/t/p/w500`.
    pub fn new(collection: Arc<dyn DocumentCollection>, image_base: impl Into<String>) -> Self {
        Self {
            collection,
            image_base: image_base.into(),
        }
    }

    /// Record that `query` was searched and `top_movie` ranked first.
    pub async fn try_record_search(
        &self,
        query: &str,
        top_movie: &Movie,
    ) -> Result<RecordOutcome, StoreError> {
        let term = normalize_query(query);
        if term.is_empty() {
            return Ok(RecordOutcome::Skipped);
        }

        let existing = self
            .collection
            .list(&[DocumentQuery::equal(SEARCH_TERM_ATTRIBUTE, term)])
            .await?;

        if let Some(document) = existing.into_iter().next() {
            let entry = parse_entry(document)?;
            let count = entry.count + 1;
            self.collection
                .update(&entry.id, json!({ COUNT_ATTRIBUTE: count }))
                .await?;
            tracing::debug!(term, count, "Incremented search count");
            return Ok(RecordOutcome::Incremented { id: entry.id, count });
        }

        let poster_url = top_movie.poster_url(&self.image_base).unwrap_or_default();
        let document = self
            .collection
            .create(json!({
                SEARCH_TERM_ATTRIBUTE: term,
                COUNT_ATTRIBUTE: 1,
                "movie_id": top_movie.id,
                "poster_url": poster_url,
            }))
            .await?;
        let entry = parse_entry(document)?;
        tracing::debug!(term, movie_id = entry.movie_id, "Created search entry");
        Ok(RecordOutcome::Created(entry))
    }

    /// Best-effort [`try_record_search`](Self::try_record_search): failures
    /// are logged and dropped.
    pub async fn record_search(&self, query: &str, top_movie: &Movie) {
        if let Err(e) = self.try_record_search(query, top_movie).await {
            tracing::error!(query = %normalize_query(query), error = %e, "Error updating search count");
        }
    }

    /// Up to `limit` entries, most searched first.
    pub async fn trending(&self, limit: usize) -> Result<Vec<SearchEntry>, StoreError> {
        let documents = self
            .collection
            .list(&[
                DocumentQuery::limit(limit),
                DocumentQuery::order_desc(COUNT_ATTRIBUTE),
            ])
            .await?;

        let mut entries = documents
            .into_iter()
            .map(parse_entry)
            .collect::<Result<Vec<_>, _>>()?;
        // The collection orders and limits; re-applied so the contract
        // holds for any backend.
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Best-effort [`trending`](Self::trending): an empty list on failure.
    pub async fn fetch_trending(&self, limit: usize) -> Vec<SearchEntry> {
        match self.trending(limit).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching trending movies");
                Vec::new()
            }
        }
    }
}

fn parse_entry(document: Value) -> Result<SearchEntry, StoreError> {
    serde_json::from_value(document).map_err(|e| StoreError::Malformed(e.to_string()))
}
