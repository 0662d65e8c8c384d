//! Document collection seam used by the trending store.
//!
//! Documents are schema-on-write JSON objects carrying a store-generated
//! `$id`. The query model covers exactly what the tally needs: exact-match
//! filtering, descending order and a result limit.

use async_trait::async_trait;
use serde_json::{json, Value};

/// Attribute holding the document identifier.
pub const ID_ATTRIBUTE: &str = "$id";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Any failure from the trending document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store returned a non-2xx status code.
    #[error("Document store error ({status}): {body}")]
    Status { status: u16, body: String },

    /// No document exists with the given id.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// A document or URL did not have the expected shape.
    #[error("Malformed document: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// A single query clause applied when listing documents.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentQuery {
    /// Keep documents whose `attribute` equals `value` exactly.
    Equal { attribute: String, value: Value },
    /// Order by a numeric attribute, largest first.
    OrderDesc(String),
    /// Return at most this many documents.
    Limit(usize),
}

impl DocumentQuery {
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equal {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Self::OrderDesc(attribute.into())
    }

    pub fn limit(limit: usize) -> Self {
        Self::Limit(limit)
    }

    /// Appwrite's JSON query syntax, e.g.
    /// `{"method":"equal","attribute":"SearchTerm","values":["batman"]}`.
    pub fn to_appwrite(&self) -> String {
        let query = match self {
            Self::Equal { attribute, value } => json!({
                "method": "equal",
                "attribute": attribute,
                "values": [value],
            }),
            Self::OrderDesc(attribute) => json!({
                "method": "orderDesc",
                "attribute": attribute,
            }),
            Self::Limit(limit) => json!({
                "method": "limit",
                "values": [limit],
            }),
        };
        query.to_string()
    }
}

// ---------------------------------------------------------------------------
// DocumentCollection
// ---------------------------------------------------------------------------

/// A remote collection of JSON documents.
///
/// No operation is transactional with respect to another: a `list`
/// followed by `create`/`update` may interleave with other writers.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// List documents matching every clause in `queries`.
    async fn list(&self, queries: &[DocumentQuery]) -> Result<Vec<Value>, StoreError>;

    /// Create a document with a generated id; returns the stored document.
    async fn create(&self, data: Value) -> Result<Value, StoreError>;

    /// Overwrite the given attributes of document `id`, leaving the rest
    /// untouched; returns the stored document.
    async fn update(&self, id: &str, data: Value) -> Result<Value, StoreError>;
}

/// Generate a document id in the store's accepted alphabet.
pub fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
