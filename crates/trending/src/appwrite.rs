//! Appwrite databases REST client for a single collection.
//!
//! Endpoints used, relative to the configured endpoint (e.g.
//! `https://cloud.appwrite.io/v1`):
//!
//! | Operation | Request                                                    |
//! |-----------|------------------------------------------------------------|
//! | list      | `GET  /databases/{db}/collections/{col}/documents?queries[]=` |
//! | create    | `POST /databases/{db}/collections/{col}/documents`         |
//! | update    | `PATCH /databases/{db}/collections/{col}/documents/{id}`   |

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::collection::{unique_id, DocumentCollection, DocumentQuery, StoreError};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";

/// Connection settings for one Appwrite collection.
#[derive(Debug, Clone)]
pub struct AppwriteConfig {
    /// API endpoint including the version segment.
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    /// Server API key; browser-style sessions run without one.
    pub api_key: Option<String>,
}

/// Body of a document list response.
#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<Value>,
}

/// [`DocumentCollection`] over the Appwrite REST API.
#[derive(Clone)]
pub struct AppwriteCollection {
    client: reqwest::Client,
    config: AppwriteConfig,
}

impl AppwriteCollection {
    pub fn new(config: AppwriteConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a collection client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, mut config: AppwriteConfig) -> Self {
        config.endpoint = config.endpoint.trim_end_matches('/').to_string();
        Self { client, config }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.config.endpoint, self.config.database_id, self.config.collection_id
        )
    }

    fn list_url(&self, queries: &[DocumentQuery]) -> Result<Url, StoreError> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_appwrite()))
            .collect();
        Url::parse_with_params(&self.documents_url(), &params)
            .map_err(|e| StoreError::Malformed(format!("invalid endpoint {}: {e}", self.config.endpoint)))
    }

    /// Attach project and key headers to a request.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request.header(PROJECT_HEADER, &self.config.project_id);
        match &self.config.api_key {
            Some(key) => request.header(KEY_HEADER, key),
            None => request,
        }
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, or return a
    /// [`StoreError::Status`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl DocumentCollection for AppwriteCollection {
    async fn list(&self, queries: &[DocumentQuery]) -> Result<Vec<Value>, StoreError> {
        let url = self.list_url(queries)?;
        let response = self.authorize(self.client.get(url)).send().await?;
        let list: DocumentList = Self::parse_response(response).await?;
        Ok(list.documents)
    }

    async fn create(&self, data: Value) -> Result<Value, StoreError> {
        let body = json!({
            "documentId": unique_id(),
            "data": data,
        });
        let response = self
            .authorize(self.client.post(self.documents_url()))
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn update(&self, id: &str, data: Value) -> Result<Value, StoreError> {
        let body = json!({ "data": data });
        let response = self
            .authorize(self.client.patch(format!("{}/{}", self.documents_url(), id)))
            .json(&body)
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Self::parse_response(response).await
    }
}
