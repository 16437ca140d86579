//! HTTP surface for the product endpoints.

pub mod claims;
pub mod form;
pub mod handlers;
pub mod response;

pub use claims::{claims_from_gateway, AdminIdentity};
pub use response::{ApiError, StatusPolicy};

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{middleware, Router};

use crate::product_actor::ProductError;
use crate::product_service::ProductService;

#[derive(Clone)]
pub struct AppState {
    pub service: ProductService,
    pub status_policy: StatusPolicy,
}

impl AppState {
    pub fn new(service: ProductService, status_policy: StatusPolicy) -> Self {
        Self {
            service,
            status_policy,
        }
    }

    pub fn reject(&self, err: ProductError) -> ApiError {
        self.status_policy.reject(err)
    }
}

pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/{product_uuid}",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::from_fn(claims_from_gateway))
        .with_state(state)
}
