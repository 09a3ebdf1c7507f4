//! Vintly Server - the remote product service.
//!
//! A thin CRUD layer translating validated listing drafts into persisted
//! rows: a relational product catalog plus object storage for photos, and a
//! photo-enhancement endpoint with a demo-mode fallback.
//!
//! # Architecture
//!
//! - Axum handlers under `/api`, JSON in and out
//! - [`catalog`] - the repository seam: Postgres via sqlx when
//!   `DATABASE_URL` is configured, an in-memory catalog in demo mode
//! - [`objects`] - photo storage: a hosted bucket over REST when
//!   configured, a local uploads directory served under `/uploads` otherwise
//! - [`enhance`] - background removal through a hosted model when a token
//!   is configured, fixed client-appliable transformations otherwise
//!
//! Every degraded mode is deliberate: the service runs end-to-end with zero
//! external dependencies, which is also how the integration tests drive it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod enhance;
pub mod error;
pub mod objects;
pub mod routes;
pub mod seed;
pub mod state;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router.
#[must_use]
pub fn app(state: AppState) -> Router {
    let uploads_dir = state.config().uploads_dir.clone();

    Router::new()
        .route("/health", get(routes::health))
        .route("/health/ready", get(routes::readiness))
        .merge(routes::router())
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
