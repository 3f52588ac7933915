use axum::Router;

pub mod invoices;
pub mod system;

/// Router for all versioned endpoints.
pub fn router() -> Router {
    Router::new().nest("/v1/invoices", invoices::router())
}
