//! Request adapters and request logging.
//!
//! Each customer adapter runs as route-level middleware: it pulls its inputs
//! out of the request, makes exactly one access-layer call, and then either
//! stages the result for the next stage (`next.run`) or hands the error to
//! the error-handling stage by returning it. Errors pass through `?`
//! unchanged; adapters never look at what kind of error they got.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use serde::de::DeserializeOwned;
use tokio_stream::StreamExt;

use clientele_customers::{CustomerDraft, CustomerPatch};

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::Staged;

/// Largest request body an adapter will read (100 KiB).
pub const MAX_BODY_BYTES: usize = 100 * 1024;

/// POST /customers
pub async fn add_customer(
    State(services): State<Arc<AppServices>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, body) = req.into_parts();
    let draft: CustomerDraft = read_json(body).await?;

    let created = services.customers().create(draft).await?;
    Ok(forward(Request::from_parts(parts, Body::empty()), next, created).await)
}

/// GET /customers
pub async fn get_customers(
    State(services): State<Arc<AppServices>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let customers = services.customers().list().await?;
    Ok(forward(req, next, customers).await)
}

/// GET /customers/:customer_id
pub async fn get_customer_by_id(
    State(services): State<Arc<AppServices>>,
    Path(customer_id): Path<String>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let customer = services.customers().get_by_id(&customer_id).await?;
    Ok(forward(req, next, customer).await)
}

/// PUT /customers/:customer_id
pub async fn modify_customer(
    State(services): State<Arc<AppServices>>,
    Path(customer_id): Path<String>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, body) = req.into_parts();
    let patch: CustomerPatch = read_json(body).await?;

    let updated = services.customers().update(&customer_id, patch).await?;
    Ok(forward(Request::from_parts(parts, Body::empty()), next, updated).await)
}

/// DELETE /customers/:customer_id
pub async fn remove_customer(
    State(services): State<Arc<AppServices>>,
    Path(customer_id): Path<String>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let removed = services.customers().delete(&customer_id).await?;
    Ok(forward(req, next, removed).await)
}

async fn forward<T>(mut req: Request, next: Next, value: T) -> Response
where
    T: Clone + Send + Sync + 'static,
{
    req.extensions_mut().insert(Staged(value));
    next.run(req).await
}

/// Read the whole body as JSON. An empty body reads as `{}`.
///
/// Stops reading as soon as the body grows past [`MAX_BODY_BYTES`].
async fn read_json<T: DeserializeOwned>(body: Body) -> Result<T, ApiError> {
    let mut stream = body.into_data_stream();
    let mut bytes = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ApiError::MalformedBody(e.to_string()))?;
        if bytes.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(ApiError::PayloadTooLarge {
                limit: MAX_BODY_BYTES,
            });
        }
        bytes.extend_from_slice(&chunk);
    }

    let raw: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };
    serde_json::from_slice(raw).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

/// One log line per request: method, path, status and latency.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "request completed"
    );
    response
}
