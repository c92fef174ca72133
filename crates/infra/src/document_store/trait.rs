use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;
use uuid::Uuid;

/// Body of a stored document (a JSON object, without its identifier).
pub type DocumentBody = Map<String, JsonValue>;

/// A document as held by the store: its assigned identifier plus its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: Uuid,
    pub body: DocumentBody,
}

/// Document store operation error.
///
/// These are **infrastructure errors** (connectivity, query execution, stored
/// data integrity) as opposed to domain errors (validation, identifiers).
///
/// "Nothing matched" is not an error: lookups by id return `Ok(None)` and the
/// caller decides what an absent document means.
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    /// The backing storage could not be reached (pool closed/timed out, IO).
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// The storage engine rejected or failed to execute an operation.
    #[error("document store query failed: {0}")]
    Query(String),

    /// A stored row could not be read back as a document.
    #[error("stored document is corrupt: {0}")]
    Corrupt(String),

    /// Any driver failure that fits none of the above.
    #[error("document store failure: {0}")]
    Other(String),
}

/// Storage handle for JSON documents grouped in named collections.
///
/// Every method is a single round-trip to storage. No method retries, caches
/// or coordinates with concurrent callers; two concurrent updates of the same
/// document resolve however the backend orders them (last write wins).
///
/// ## Ordering
///
/// `find_all` returns documents in the backend's natural insertion order.
///
/// ## Identity
///
/// Identifiers are assigned by the store in `insert` and never change.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new document and return it with its assigned identifier.
    async fn insert(
        &self,
        collection: &str,
        body: DocumentBody,
    ) -> Result<StoredDocument, DocumentStoreError>;

    /// All documents of a collection, in insertion order.
    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, DocumentStoreError>;

    async fn find_by_id(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<StoredDocument>, DocumentStoreError>;

    /// Overwrite the keys present in `patch` and return the document **after**
    /// the change. Keys absent from `patch` are left untouched.
    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        patch: DocumentBody,
    ) -> Result<Option<StoredDocument>, DocumentStoreError>;

    /// Remove a document and return it as it was **before** removal.
    async fn delete_by_id(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<StoredDocument>, DocumentStoreError>;
}

#[async_trait]
impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    async fn insert(
        &self,
        collection: &str,
        body: DocumentBody,
    ) -> Result<StoredDocument, DocumentStoreError> {
        (**self).insert(collection, body).await
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        (**self).find_all(collection).await
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        (**self).find_by_id(collection, id).await
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        patch: DocumentBody,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        (**self).update_by_id(collection, id, patch).await
    }

    async fn delete_by_id(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        (**self).delete_by_id(collection, id).await
    }
}
