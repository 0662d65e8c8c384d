//! Trending search tally backed by a remote document collection.
//!
//! - [`collection`]: the [`DocumentCollection`] seam and its query model.
//! - [`appwrite`]: REST implementation against an Appwrite databases API.
//! - [`memory`]: process-local implementation for offline runs and tests.
//! - [`store`]: [`TrendingStore`], the upsert-and-increment tally.

pub mod appwrite;
pub mod collection;
pub mod memory;
pub mod store;

pub use appwrite::{AppwriteCollection, AppwriteConfig};
pub use collection::{DocumentCollection, DocumentQuery, StoreError};
pub use memory::MemoryCollection;
pub use store::{RecordOutcome, TrendingStore};
