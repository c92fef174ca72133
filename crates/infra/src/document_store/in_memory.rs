use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::r#trait::{DocumentBody, DocumentStore, DocumentStoreError, StoredDocument};

/// In-memory document store.
///
/// Intended for tests/dev. Each collection is a vector in insertion order;
/// lookups are linear scans. Identifiers are UUIDv7.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> DocumentStoreError {
        DocumentStoreError::Unavailable("lock poisoned".to_string())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        body: DocumentBody,
    ) -> Result<StoredDocument, DocumentStoreError> {
        let stored = StoredDocument {
            id: Uuid::now_v7(),
            body,
        };

        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(stored.clone());

        Ok(stored)
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        patch: DocumentBody,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
        else {
            return Ok(None);
        };

        doc.body.extend(patch);
        Ok(Some(doc.clone()))
    }

    async fn delete_by_id(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };

        let Some(idx) = docs.iter().position(|d| d.id == id) else {
            return Ok(None);
        };

        // `Vec::remove` keeps the remaining documents in insertion order.
        Ok(Some(docs.remove(idx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> DocumentBody {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = InMemoryDocumentStore::new();
        let a = store.insert("things", body(json!({ "n": 1 }))).await.unwrap();
        let b = store.insert("things", body(json!({ "n": 1 }))).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.body, b.body);
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order_and_separates_collections() {
        let store = InMemoryDocumentStore::new();
        let first = store.insert("things", body(json!({ "n": 1 }))).await.unwrap();
        store.insert("others", body(json!({ "n": 99 }))).await.unwrap();
        let second = store.insert("things", body(json!({ "n": 2 }))).await.unwrap();

        let all = store.find_all("things").await.unwrap();
        assert_eq!(all, vec![first, second]);
        assert!(store.find_all("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_merges_patch_and_returns_the_new_state() {
        let store = InMemoryDocumentStore::new();
        let doc = store
            .insert("things", body(json!({ "a": "1", "b": "2" })))
            .await
            .unwrap();

        let updated = store
            .update_by_id("things", doc.id, body(json!({ "b": "3", "c": "4" })))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.body, body(json!({ "a": "1", "b": "3", "c": "4" })));

        let found = store.find_by_id("things", doc.id).await.unwrap().unwrap();
        assert_eq!(found, updated);
    }

    #[tokio::test]
    async fn update_and_delete_of_unknown_id_return_none() {
        let store = InMemoryDocumentStore::new();
        store.insert("things", body(json!({}))).await.unwrap();
        let unknown = Uuid::now_v7();

        assert!(store.find_by_id("things", unknown).await.unwrap().is_none());
        assert!(
            store
                .update_by_id("things", unknown, body(json!({ "a": 1 })))
                .await
                .unwrap()
                .is_none()
        );
        assert!(store.delete_by_id("things", unknown).await.unwrap().is_none());
        assert!(store.delete_by_id("nowhere", unknown).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_returns_the_removed_document_once() {
        let store = InMemoryDocumentStore::new();
        let a = store.insert("things", body(json!({ "n": 1 }))).await.unwrap();
        let b = store.insert("things", body(json!({ "n": 2 }))).await.unwrap();
        let c = store.insert("things", body(json!({ "n": 3 }))).await.unwrap();

        let removed = store.delete_by_id("things", b.id).await.unwrap();
        assert_eq!(removed, Some(b.clone()));
        assert!(store.delete_by_id("things", b.id).await.unwrap().is_none());
        assert_eq!(store.find_all("things").await.unwrap(), vec![a, c]);
    }
}
