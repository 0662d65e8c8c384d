//! Process-local document collection.
//!
//! Implements the same query semantics as the remote store so the tally can
//! run without network access. Contents live only as long as the process.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::collection::{unique_id, DocumentCollection, DocumentQuery, StoreError, ID_ATTRIBUTE};

/// In-memory [`DocumentCollection`].
#[derive(Debug, Default)]
pub struct MemoryCollection {
    documents: RwLock<Vec<Map<String, Value>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn as_object(data: Value) -> Result<Map<String, Value>, StoreError> {
    match data {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Malformed(format!(
            "document data must be a JSON object, got {other}"
        ))),
    }
}

/// Order two attribute values, largest first. Missing or non-numeric values
/// sort last.
fn descending(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.and_then(Value::as_f64);
    let b = b.and_then(Value::as_f64);
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn list(&self, queries: &[DocumentQuery]) -> Result<Vec<Value>, StoreError> {
        let documents = self.documents.read().await;

        let mut matched: Vec<&Map<String, Value>> = documents
            .iter()
            .filter(|doc| {
                queries.iter().all(|q| match q {
                    DocumentQuery::Equal { attribute, value } => doc.get(attribute) == Some(value),
                    _ => true,
                })
            })
            .collect();

        for q in queries {
            if let DocumentQuery::OrderDesc(attribute) = q {
                matched.sort_by(|a, b| descending(a.get(attribute), b.get(attribute)));
            }
        }

        let limit = queries
            .iter()
            .filter_map(|q| match q {
                DocumentQuery::Limit(n) => Some(*n),
                _ => None,
            })
            .min();
        if let Some(limit) = limit {
            matched.truncate(limit);
        }

        Ok(matched.into_iter().cloned().map(Value::Object).collect())
    }

    async fn create(&self, data: Value) -> Result<Value, StoreError> {
        let mut document = as_object(data)?;
        document.insert(ID_ATTRIBUTE.to_string(), Value::String(unique_id()));

        self.documents.write().await.push(document.clone());
        Ok(Value::Object(document))
    }

    async fn update(&self, id: &str, data: Value) -> Result<Value, StoreError> {
        let changes = as_object(data)?;
        let mut documents = self.documents.write().await;

        let document = documents
            .iter_mut()
            .find(|doc| doc.get(ID_ATTRIBUTE).and_then(Value::as_str) == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        for (key, value) in changes {
            if key != ID_ATTRIBUTE {
                document.insert(key, value);
            }
        }
        Ok(Value::Object(document.clone()))
    }
}
