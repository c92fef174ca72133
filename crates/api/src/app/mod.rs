//! HTTP application wiring.
//!
//! - `services.rs`: storage wiring (document store + customer access layer)
//! - `routes/`: route tables and the final response stages
//! - `errors.rs`: error-handling stage

use std::sync::Arc;

use axum::{Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, build_services};

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: AppServices) -> Router {
    let services = Arc::new(services);

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/customers", routes::customers::router(services))
        .fallback(routes::system::not_found)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::log_requests)))
}
