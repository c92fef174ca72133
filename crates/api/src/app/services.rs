//! Storage wiring: builds the document store once at startup and hands it to
//! the access layer.

use std::sync::Arc;

use clientele_infra::{
    CustomerService, DocumentStore, DocumentStoreError, InMemoryDocumentStore,
    PostgresDocumentStore,
};

use crate::config::StoreBackend;

/// Store handle shared by every request.
pub type SharedStore = Arc<dyn DocumentStore>;

/// Services available to request adapters.
#[derive(Clone)]
pub struct AppServices {
    customers: CustomerService<SharedStore>,
}

impl AppServices {
    pub fn new(store: SharedStore) -> Self {
        Self {
            customers: CustomerService::new(store),
        }
    }

    /// Services over a fresh in-memory store (tests/dev).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryDocumentStore::new()))
    }

    pub fn customers(&self) -> &CustomerService<SharedStore> {
        &self.customers
    }
}

/// Connect the configured backend and build the services on top of it.
pub async fn build_services(backend: &StoreBackend) -> Result<AppServices, DocumentStoreError> {
    match backend {
        StoreBackend::Memory => {
            tracing::warn!("using in-memory document store; data is lost on restart");
            Ok(AppServices::in_memory())
        }
        StoreBackend::Postgres(db) => {
            tracing::info!(url = %db.redacted_url(), "connecting to postgres document store");
            let store = PostgresDocumentStore::connect(
                &db.url,
                db.max_connections,
                db.acquire_timeout,
            )
            .await?;
            store.ensure_schema().await?;
            tracing::info!("postgres document store ready");
            Ok(AppServices::new(Arc::new(store)))
        }
    }
}
