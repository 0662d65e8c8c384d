//! HTTP client for the movie catalog API.
//!
//! Wraps the two listing endpoints the application uses (title search and
//! popularity discovery) using [`reqwest`]. Requests are bearer
//! authenticated; there are no retries, no caching and no timeout beyond the
//! transport default.

use async_trait::async_trait;
use marquee_core::search::normalize_query;
use marquee_core::{Movie, MoviePage};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Url;

use crate::MovieCatalog;

/// Message used when the catalog flags a failure without explaining it.
pub const FALLBACK_UPSTREAM_MESSAGE: &str = "Failed to fetch movies";

/// Message shown to the user when the catalog could not be reached.
pub const TRANSPORT_USER_MESSAGE: &str = "Error fetching movies. Please try again later.";

/// Errors from the catalog client.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The catalog answered with a non-2xx status code.
    #[error("Catalog API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The configured base URL could not be turned into a request URL.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// The catalog responded successfully but flagged the request as failed.
    #[error("Catalog reported failure: {message}")]
    Upstream { message: String },
}

impl CatalogError {
    /// Whether the request never completed with a success status.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Upstream { .. })
    }

    /// The single human-readable message shown in place of the results.
    pub fn user_message(&self) -> String {
        match self {
            Self::Upstream { message } => message.clone(),
            _ => TRANSPORT_USER_MESSAGE.to_string(),
        }
    }
}

/// HTTP client for the catalog.
#[derive(Clone)]
pub struct CatalogApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CatalogApi {
    /// Create a client for the catalog rooted at `base_url`, e.g.
    /// `https://api.themoviedb.org/3`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the listing URL for `query`.
    ///
    /// An empty (or whitespace-only) query selects the popularity discovery
    /// listing; anything else searches by title.
    pub fn listing_url(&self, query: &str) -> Result<Url, CatalogError> {
        let query = normalize_query(query);
        let parsed = if query.is_empty() {
            Url::parse_with_params(
                &format!("{}/discover/movie", self.base_url),
                &[("sort_by", "popularity.desc")],
            )
        } else {
            Url::parse_with_params(
                &format!("{}/search/movie", self.base_url),
                &[("query", query)],
            )
        };
        parsed.map_err(|e| CatalogError::InvalidUrl(format!("{}: {e}", self.base_url)))
    }

    /// Fetch one listing page and apply the payload-level failure check.
    pub async fn fetch_page(&self, query: &str) -> Result<MoviePage, CatalogError> {
        let url = self.listing_url(query)?;
        tracing::debug!(url = %url, "Fetching movie listing");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let page: MoviePage = Self::parse_response(response).await?;
        if page.is_failure() {
            let message = page
                .failure_message()
                .unwrap_or(FALLBACK_UPSTREAM_MESSAGE)
                .to_string();
            return Err(CatalogError::Upstream { message });
        }
        Ok(page)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, or return a
    /// [`CatalogError::Status`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CatalogError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MovieCatalog for CatalogApi {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError> {
        let page = self.fetch_page(query).await?;
        let movies = page.into_results();
        tracing::debug!(query = %normalize_query(query), count = movies.len(), "Movie listing fetched");
        Ok(movies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> CatalogApi {
        CatalogApi::new("https://api.themoviedb.org/3/", "key")
    }

    #[test]
    fn empty_query_uses_discover_listing() {
        let url = api().listing_url("").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/discover/movie?sort_by=popularity.desc"
        );
        assert_eq!(api().listing_url("   ").unwrap(), url);
    }

    #[test]
    fn search_query_is_trimmed_and_encoded() {
        let url = api().listing_url(" fast & furious ").unwrap();
        assert_eq!(url.path(), "/3/search/movie");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("query".to_string(), "fast & furious".to_string())]);
        assert!(!url.as_str().contains(' '));
        assert!(url.as_str().contains("%26"));
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let api = CatalogApi::new("not a url", "key");
        assert!(matches!(api.listing_url("x"), Err(CatalogError::InvalidUrl(_))));
    }

    #[test]
    fn user_message_prefers_upstream_text() {
        let upstream = CatalogError::Upstream {
            message: "Invalid API key".into(),
        };
        assert!(!upstream.is_transport());
        assert_eq!(upstream.user_message(), "Invalid API key");

        let status = CatalogError::Status {
            status: 503,
            body: String::new(),
        };
        assert!(status.is_transport());
        assert_eq!(status.user_message(), TRANSPORT_USER_MESSAGE);
    }

    #[test]
    fn status_error_display() {
        let err = CatalogError::Status {
            status: 401,
            body: "nope".into(),
        };
        assert_eq!(err.to_string(), "Catalog API error (401): nope");
    }
}
