//! One-shot trending list loader.

use std::sync::atomic::{AtomicBool, Ordering};

use marquee_core::SearchEntry;
use marquee_trending::TrendingStore;
use tokio::sync::watch;

/// Loads the trending list once per session and publishes it.
///
/// Independent of the search coordinator: a failed load leaves the
/// published list as it was (initially empty) and is only logged.
pub struct TrendingLoader {
    store: TrendingStore,
    limit: usize,
    entries: watch::Sender<Vec<SearchEntry>>,
    started: AtomicBool,
}

impl TrendingLoader {
    pub fn new(store: TrendingStore, limit: usize) -> Self {
        let (entries, _) = watch::channel(Vec::new());
        Self {
            store,
            limit,
            entries,
            started: AtomicBool::new(false),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<SearchEntry>> {
        self.entries.subscribe()
    }

    /// The currently published list.
    pub fn entries(&self) -> Vec<SearchEntry> {
        self.entries.borrow().clone()
    }

    /// Fetch and publish the trending list.
    ///
    /// Returns `true` if a list was published. Only the first call does
    /// any work.
    pub async fn load(&self) -> bool {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::debug!("Trending list already loaded this session");
            return false;
        }

        match self.store.trending(self.limit).await {
            Ok(entries) => {
                tracing::info!(count = entries.len(), "Trending searches loaded");
                self.entries.send_replace(entries);
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching trending movies");
                false
            }
        }
    }
}
