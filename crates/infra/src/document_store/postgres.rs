//! Postgres-backed document store.
//!
//! Documents live in a single `documents` table as JSONB bodies, keyed by
//! `(collection, id)`. Identifiers are generated by the database
//! (`gen_random_uuid()`), and a `BIGSERIAL` column records insertion order so
//! that `find_all` can return documents in the order they were created.
//!
//! ## Error Mapping
//!
//! | SQLx Error | DocumentStoreError | Scenario |
//! |------------|--------------------|----------|
//! | `PoolTimedOut`, `PoolClosed`, `Io`, `Tls` | `Unavailable` | Database unreachable or pool exhausted |
//! | `ColumnDecode`, `ColumnNotFound`, `Decode` | `Corrupt` | Row cannot be read back as a document |
//! | `Database` | `Query` | Statement rejected or failed |
//! | anything else (`Protocol`, `WorkerCrashed`, ...) | `Other` | Uncategorized driver failure |
//!
//! ## Thread Safety
//!
//! `PostgresDocumentStore` is `Send + Sync` and can be shared across tasks.
//! Connection management is left to the SQLx pool.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use tracing::{Span, instrument};
use uuid::Uuid;

use super::r#trait::{DocumentBody, DocumentStore, DocumentStoreError, StoredDocument};

/// Postgres-backed document store.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: Arc<PgPool>,
}

impl PostgresDocumentStore {
    /// Create a new PostgresDocumentStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a connection pool against `url`.
    ///
    /// The pool connects eagerly so that a bad URL or unreachable server
    /// surfaces at startup instead of on the first request.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, DocumentStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Ok(Self::new(pool))
    }

    /// Create the `documents` table and its ordering index if missing.
    ///
    /// Idempotent; safe to run on every startup.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), DocumentStoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                seq BIGSERIAL NOT NULL,
                collection TEXT NOT NULL,
                id UUID NOT NULL DEFAULT gen_random_uuid(),
                body JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS documents_collection_seq_idx ON documents (collection, seq)",
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(
        skip(self, body),
        fields(collection = %collection, document_id = tracing::field::Empty),
        err
    )]
    async fn insert(
        &self,
        collection: &str,
        body: DocumentBody,
    ) -> Result<StoredDocument, DocumentStoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO documents (collection, body)
            VALUES ($1, $2)
            RETURNING id, body
            "#,
        )
        .bind(collection)
        .bind(JsonValue::Object(body))
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        let stored = decode_row(&row, "insert")?;
        Span::current().record("document_id", tracing::field::display(stored.id));
        Ok(stored)
    }

    #[instrument(skip(self), fields(collection = %collection), err)]
    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(collection)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter().map(|row| decode_row(row, "find_all")).collect()
    }

    #[instrument(skip(self), fields(collection = %collection, id = %id), err)]
    async fn find_by_id(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.map(|row| decode_row(&row, "find_by_id")).transpose()
    }

    #[instrument(skip(self, patch), fields(collection = %collection, id = %id), err)]
    async fn update_by_id(
        &self,
        collection: &str,
        id: Uuid,
        patch: DocumentBody,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        // `||` on JSONB objects overwrites the patched keys and keeps the rest.
        let row = sqlx::query(
            r#"
            UPDATE documents
            SET body = body || $3, updated_at = NOW()
            WHERE collection = $1 AND id = $2
            RETURNING id, body
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(JsonValue::Object(patch))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_by_id", e))?;

        row.map(|row| decode_row(&row, "update_by_id")).transpose()
    }

    #[instrument(skip(self), fields(collection = %collection, id = %id), err)]
    async fn delete_by_id(
        &self,
        collection: &str,
        id: Uuid,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        let row = sqlx::query(
            r#"
            DELETE FROM documents
            WHERE collection = $1 AND id = $2
            RETURNING id, body
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_by_id", e))?;

        row.map(|row| decode_row(&row, "delete_by_id")).transpose()
    }
}

// SQLx row types

#[derive(Debug)]
struct DocumentRow {
    id: Uuid,
    body: JsonValue,
}

impl<'r> FromRow<'r, PgRow> for DocumentRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(DocumentRow {
            id: row.try_get("id")?,
            body: row.try_get("body")?,
        })
    }
}

impl TryFrom<DocumentRow> for StoredDocument {
    type Error = DocumentStoreError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        match row.body {
            JsonValue::Object(body) => Ok(StoredDocument { id: row.id, body }),
            other => Err(DocumentStoreError::Corrupt(format!(
                "document {} has a non-object body: {}",
                row.id, other
            ))),
        }
    }
}

fn decode_row(row: &PgRow, operation: &str) -> Result<StoredDocument, DocumentStoreError> {
    DocumentRow::from_row(row)
        .map_err(|e| map_sqlx_error(operation, e))?
        .try_into()
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> DocumentStoreError {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => {
            DocumentStoreError::Unavailable(format!("{operation}: {err}"))
        }
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_) => DocumentStoreError::Corrupt(format!("{operation}: {err}")),
        sqlx::Error::Database(db_err) => DocumentStoreError::Query(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        _ => DocumentStoreError::Other(format!("sqlx error in {operation}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer_service::ServiceError;

    #[test]
    fn connectivity_failures_map_to_unavailable() {
        for err in [sqlx::Error::PoolTimedOut, sqlx::Error::PoolClosed] {
            assert!(matches!(
                map_sqlx_error("find_all", err),
                DocumentStoreError::Unavailable(_)
            ));
        }

        let io = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        match map_sqlx_error("insert", io) {
            DocumentStoreError::Unavailable(msg) => assert!(msg.starts_with("insert:")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unreadable_rows_map_to_corrupt() {
        let err = sqlx::Error::ColumnNotFound("body".to_string());
        assert!(matches!(
            map_sqlx_error("find_by_id", err),
            DocumentStoreError::Corrupt(_)
        ));
    }

    #[test]
    fn database_errors_are_the_only_query_failures() {
        let err = sqlx::Error::Protocol("garbled frame".to_string());
        match map_sqlx_error("find_all", err) {
            DocumentStoreError::Other(msg) => assert!(msg.contains("find_all")),
            other => panic!("unexpected: {other:?}"),
        }

        for err in [sqlx::Error::RowNotFound, sqlx::Error::WorkerCrashed] {
            assert!(matches!(
                map_sqlx_error("delete_by_id", err),
                DocumentStoreError::Other(_)
            ));
        }
    }

    #[test]
    fn uncategorized_driver_failures_reach_callers_as_unknown() {
        let err = map_sqlx_error("insert", sqlx::Error::WorkerCrashed);
        assert!(matches!(ServiceError::from(err), ServiceError::Unknown(_)));

        let err = map_sqlx_error("insert", sqlx::Error::PoolTimedOut);
        assert!(matches!(ServiceError::from(err), ServiceError::Persistence(_)));
    }

    #[test]
    fn non_object_bodies_are_corrupt() {
        let row = DocumentRow {
            id: Uuid::now_v7(),
            body: JsonValue::Array(vec![]),
        };
        assert!(matches!(
            StoredDocument::try_from(row),
            Err(DocumentStoreError::Corrupt(_))
        ));
    }

    #[test]
    fn object_bodies_convert() {
        let id = Uuid::now_v7();
        let row = DocumentRow {
            id,
            body: serde_json::json!({ "firstName": "Jane" }),
        };
        let stored = StoredDocument::try_from(row).unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.body["firstName"], "Jane");
    }
}
