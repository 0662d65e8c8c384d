//! Read-only client for the movie catalog.
//!
//! [`MovieCatalog`] is the seam the coordinator depends on; [`CatalogApi`]
//! implements it over the catalog's HTTP API using [`reqwest`].

pub mod api;

use async_trait::async_trait;
use marquee_core::Movie;

pub use api::{CatalogApi, CatalogError, FALLBACK_UPSTREAM_MESSAGE, TRANSPORT_USER_MESSAGE};

/// Source of movie listings.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Fetch the movies matching `query`, or the popular listing when the
    /// query is empty.
    async fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError>;
}
