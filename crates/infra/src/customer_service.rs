//! Customer access layer.
//!
//! Five operations, each a single document store call on the `customers`
//! collection. Required-field checks and identifier parsing happen up front
//! and never touch storage; everything else is passed straight through.
//!
//! Nothing here is recovered from or retried: every failure surfaces to the
//! caller as a [`ServiceError`].

use thiserror::Error;
use tracing::instrument;

use clientele_core::{CustomerId, DomainError};
use clientele_customers::{COLLECTION, Customer, CustomerDraft, CustomerPatch};

use crate::document_store::{DocumentStore, DocumentStoreError, StoredDocument};

/// Failure of a customer operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Required field missing/empty, or a patch would empty one.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No customer document has this identifier.
    #[error("customer {0} not found")]
    NotFound(CustomerId),

    /// The identifier is not well formed for the store.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Storage could not be reached or rejected the operation.
    #[error("persistence failure: {0}")]
    Persistence(#[source] DocumentStoreError),

    /// Anything else reported by storage, including documents that no longer
    /// match the customer schema.
    #[error("unknown failure: {0}")]
    Unknown(String),
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::InvalidId(msg) => Self::InvalidIdentifier(msg),
        }
    }
}

impl From<DocumentStoreError> for ServiceError {
    fn from(err: DocumentStoreError) -> Self {
        match err {
            DocumentStoreError::Corrupt(msg) | DocumentStoreError::Other(msg) => Self::Unknown(msg),
            other => Self::Persistence(other),
        }
    }
}

/// Access layer over an injected document store handle.
///
/// Holds no state of its own; every call round-trips to `store`.
#[derive(Clone)]
pub struct CustomerService<S> {
    store: S,
}

impl<S> CustomerService<S>
where
    S: DocumentStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }

    /// Persist a new customer and return it with its assigned identifier.
    #[instrument(skip_all, err)]
    pub async fn create(&self, draft: CustomerDraft) -> Result<Customer, ServiceError> {
        let fields = draft.validate()?;
        let stored = self.store.insert(COLLECTION, fields.to_document()).await?;
        let customer = decode(stored)?;

        tracing::info!(customer_id = %customer.id, "customer created");
        Ok(customer)
    }

    /// Every stored customer, in the store's natural order.
    #[instrument(skip_all, err)]
    pub async fn list(&self) -> Result<Vec<Customer>, ServiceError> {
        let docs = self.store.find_all(COLLECTION).await?;
        docs.into_iter().map(decode).collect()
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&self, id: &str) -> Result<Customer, ServiceError> {
        let id: CustomerId = id.parse()?;
        match self.store.find_by_id(COLLECTION, *id.as_uuid()).await? {
            Some(stored) => decode(stored),
            None => Err(ServiceError::NotFound(id)),
        }
    }

    /// Apply `patch` and return the customer **after** the change.
    #[instrument(skip(self, patch), err)]
    pub async fn update(&self, id: &str, patch: CustomerPatch) -> Result<Customer, ServiceError> {
        let id: CustomerId = id.parse()?;
        patch.validate()?;

        match self
            .store
            .update_by_id(COLLECTION, *id.as_uuid(), patch.to_document())
            .await?
        {
            Some(stored) => {
                tracing::info!(customer_id = %id, "customer updated");
                decode(stored)
            }
            None => Err(ServiceError::NotFound(id)),
        }
    }

    /// Remove a customer and return it as it was **before** removal.
    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: &str) -> Result<Customer, ServiceError> {
        let id: CustomerId = id.parse()?;
        match self.store.delete_by_id(COLLECTION, *id.as_uuid()).await? {
            Some(stored) => {
                tracing::info!(customer_id = %id, "customer deleted");
                decode(stored)
            }
            None => Err(ServiceError::NotFound(id)),
        }
    }
}

fn decode(stored: StoredDocument) -> Result<Customer, ServiceError> {
    let id = CustomerId::from_uuid(stored.id);
    Customer::from_document(id, stored.body)
        .map_err(|e| ServiceError::Unknown(format!("customer {id} does not match the schema: {e}")))
}
