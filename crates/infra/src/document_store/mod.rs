//! Document store boundary.
//!
//! Collections of JSON documents addressed by store-assigned UUIDs. The
//! access layer only ever sees the `DocumentStore` trait; which backend sits
//! behind it is decided once at startup.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use r#trait::{DocumentBody, DocumentStore, DocumentStoreError, StoredDocument};
