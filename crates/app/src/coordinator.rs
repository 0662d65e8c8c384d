//! Search coordinator.
//!
//! [`SearchCoordinator`] turns settled queries into catalog requests and
//! publishes the resulting [`SearchState`] on a `watch` channel. A
//! successful non-empty search also records its top hit in the trending
//! tally on a background task; that write never affects the search state.
//!
//! Requests are not cancelled when a newer query arrives. Each request is
//! tagged with a monotonically increasing epoch instead, and a response is
//! applied only if its epoch is still the latest issued.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use marquee_catalog::MovieCatalog;
use marquee_core::search::normalize_query;
use marquee_core::Movie;
use marquee_trending::TrendingStore;
use tokio::sync::{mpsc, watch};
use tokio_util::task::TaskTracker;

use crate::state::{SearchState, SearchStatus};

/// What became of a single [`SearchCoordinator::search`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The response was applied and left the state in this status.
    Applied(SearchStatus),
    /// A newer request was issued meanwhile; the response was dropped.
    Stale,
}

pub struct SearchCoordinator {
    catalog: Arc<dyn MovieCatalog>,
    trending: TrendingStore,
    state: watch::Sender<SearchState>,
    latest_epoch: AtomicU64,
    /// In-flight searches and trending writes.
    tasks: TaskTracker,
}

impl SearchCoordinator {
    pub fn new(catalog: Arc<dyn MovieCatalog>, trending: TrendingStore) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            catalog,
            trending,
            state,
            latest_epoch: AtomicU64::new(0),
            tasks: TaskTracker::new(),
        }
    }

    /// Receive every published [`SearchState`].
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// The current state.
    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Fetch the listing for `raw_query` and publish the outcome.
    pub async fn search(&self, raw_query: &str) -> SearchOutcome {
        let query = normalize_query(raw_query).to_string();

        // Issued under the state lock so epochs are ordered like the writes.
        let mut epoch = 0;
        self.state.send_modify(|s| {
            epoch = self.latest_epoch.fetch_add(1, Ordering::SeqCst) + 1;
            s.status = SearchStatus::Loading;
            s.query = query.clone();
            s.error_message = None;
            s.is_fetching = true;
        });
        let _guard = FetchGuard {
            state: &self.state,
            latest_epoch: &self.latest_epoch,
            epoch,
        };

        tracing::debug!(query = %query, epoch, "Fetching movies");
        let result = self.catalog.fetch_movies(&query).await;

        let (outcome, top_hit) = match result {
            Ok(movies) => {
                let count = movies.len();
                let top_hit = movies.first().cloned().filter(|_| !query.is_empty());
                let applied = self.publish(epoch, |s| {
                    s.status = SearchStatus::Success;
                    s.movies = movies;
                });
                if applied {
                    tracing::info!(query = %query, count, "Movies fetched");
                }
                (applied.then_some(SearchStatus::Success), top_hit)
            }
            Err(e) => {
                let message = e.user_message();
                let applied = self.publish(epoch, |s| {
                    s.status = SearchStatus::Error;
                    s.movies.clear();
                    s.error_message = Some(message);
                });
                if applied {
                    tracing::error!(query = %query, error = %e, "Error fetching movies");
                }
                (applied.then_some(SearchStatus::Error), None)
            }
        };

        let Some(status) = outcome else {
            tracing::debug!(query = %query, epoch, "Discarding stale movie response");
            return SearchOutcome::Stale;
        };
        if let Some(top) = top_hit {
            self.record_top_hit(query, top);
        }
        SearchOutcome::Applied(status)
    }

    /// Apply `update` and clear `is_fetching` if `epoch` is still the latest
    /// request. The check and the write happen under the state lock.
    fn publish(&self, epoch: u64, update: impl FnOnce(&mut SearchState)) -> bool {
        self.state.send_if_modified(|s| {
            if self.latest_epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            update(s);
            s.is_fetching = false;
            true
        })
    }

    /// Search every settled query from `settled` until the channel closes,
    /// then wait for outstanding work.
    ///
    /// Each query runs on its own task, so a slow request does not hold up
    /// the next one.
    pub async fn run(self: Arc<Self>, mut settled: mpsc::Receiver<String>) {
        while let Some(query) = settled.recv().await {
            let this = Arc::clone(&self);
            self.tasks.spawn(async move {
                this.search(&query).await;
            });
        }
        tracing::debug!("Settled query channel closed");
        self.flush().await;
    }

    /// Wait until every spawned search and trending write has finished.
    pub async fn flush(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    fn record_top_hit(&self, query: String, top: Movie) {
        let trending = self.trending.clone();
        self.tasks.spawn(async move {
            trending.record_search(&query, &top).await;
        });
    }
}

/// Clears `is_fetching` if its request is dropped before publishing a
/// result, unless a newer request owns the flag by then.
struct FetchGuard<'a> {
    state: &'a watch::Sender<SearchState>,
    latest_epoch: &'a AtomicU64,
    epoch: u64,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            if self.latest_epoch.load(Ordering::SeqCst) != self.epoch || !s.is_fetching {
                return false;
            }
            s.is_fetching = false;
            if s.status == SearchStatus::Loading {
                s.status = SearchStatus::Idle;
            }
            true
        });
    }
}
