//! Infrastructure layer: document storage and the customer access layer.

pub mod customer_service;
pub mod document_store;

pub use customer_service::{CustomerService, ServiceError};
pub use document_store::{
    DocumentBody, DocumentStore, DocumentStoreError, InMemoryDocumentStore, PostgresDocumentStore,
    StoredDocument,
};
