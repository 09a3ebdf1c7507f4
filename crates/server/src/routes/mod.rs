//! HTTP route handlers for the product service.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Liveness check
//! GET    /health/ready          - Readiness check (catalog ping)
//!
//! # Products
//! GET    /api/products          - List available products (filterable)
//! POST   /api/products          - Create a product from a listing draft
//! GET    /api/products/{id}     - Product detail (bumps the view counter)
//! DELETE /api/products/{id}     - Delete a product (seller-scoped)
//!
//! # Enhancement
//! POST   /api/enhance-photo     - Enhance a photo (demo-mode fallback)
//! ```

pub mod enhance;
pub mod products;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};

use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/products",
            get(products::list).post(products::create),
        )
        .route(
            "/api/products/{id}",
            get(products::detail).delete(products::remove),
        )
        .route("/api/enhance-photo", post(enhance::enhance_photo))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies catalog connectivity before returning OK. Returns 503 Service
/// Unavailable if the catalog is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.catalog().ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::error!(%err, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
