use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    handler::Handler,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use serde::Serialize;

use clientele_customers::Customer;

use crate::app::services::AppServices;
use crate::context::Staged;
use crate::middleware;

/// `/customers` routes: each is a request adapter followed by a stage that
/// serializes whatever the adapter staged.
pub fn router(services: Arc<AppServices>) -> Router {
    Router::new()
        .route(
            "/",
            post(respond_created::<Customer>.layer(from_fn_with_state(
                services.clone(),
                middleware::add_customer,
            )))
            .get(respond_ok::<Vec<Customer>>.layer(from_fn_with_state(
                services.clone(),
                middleware::get_customers,
            ))),
        )
        .route(
            "/:customer_id",
            get(respond_ok::<Customer>.layer(from_fn_with_state(
                services.clone(),
                middleware::get_customer_by_id,
            )))
            .put(respond_ok::<Customer>.layer(from_fn_with_state(
                services.clone(),
                middleware::modify_customer,
            )))
            .delete(respond_ok::<Customer>.layer(from_fn_with_state(
                services,
                middleware::remove_customer,
            ))),
        )
}

pub async fn respond_created<T>(Extension(staged): Extension<Staged<T>>) -> (StatusCode, Json<T>)
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    (StatusCode::CREATED, Json(staged.into_inner()))
}

pub async fn respond_ok<T>(Extension(staged): Extension<Staged<T>>) -> (StatusCode, Json<T>)
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    (StatusCode::OK, Json(staged.into_inner()))
}
