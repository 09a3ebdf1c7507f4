//! Vintly Server - the remote product service binary.
//!
//! Serves the product CRUD API and the photo-enhancement endpoint on port
//! 3000. Every external dependency is optional: without `DATABASE_URL` the
//! catalog lives in memory, without `STORAGE_URL` photos land in a local
//! uploads directory served by this binary, and without
//! `REPLICATE_API_TOKEN` enhancement answers in demo mode.

#![cfg_attr(not(test), forbid(unsafe_code))]

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vintly_server::catalog::{Catalog, MemoryCatalog, PgCatalog};
use vintly_server::config::ServerConfig;
use vintly_server::enhance::{Enhancer, ReplicateClient};
use vintly_server::objects::{BucketStore, LocalObjects, ObjectStore};
use vintly_server::state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vintly_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Select the catalog backend
    let catalog = match &config.database_url {
        Some(url) => {
            let pg = PgCatalog::connect(url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Connected to PostgreSQL catalog");
            Catalog::Pg(pg)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory catalog (demo mode)");
            Catalog::Memory(MemoryCatalog::new())
        }
    };

    // Select the photo storage backend
    let objects = match &config.storage {
        Some(storage) => {
            tracing::info!(
                endpoint = %storage.endpoint,
                bucket = %storage.bucket,
                "Using hosted storage bucket"
            );
            ObjectStore::Bucket(BucketStore::new(storage))
        }
        None => {
            tracing::info!(
                dir = %config.uploads_dir.display(),
                "Using local uploads directory"
            );
            ObjectStore::Local(LocalObjects::new(&config.uploads_dir, &config.base_url))
        }
    };

    // Select the enhancement backend
    let enhancer = match &config.replicate_token {
        Some(token) => {
            tracing::info!("Photo enhancement via hosted model");
            Enhancer::Replicate(ReplicateClient::new(token.clone()))
        }
        None => {
            tracing::info!("REPLICATE_API_TOKEN not set, enhancement runs in demo mode");
            Enhancer::Demo
        }
    };

    let addr = config.socket_addr();
    let state = AppState::new(config, catalog, objects, enhancer);
    let app = vintly_server::app(state);

    tracing::info!("product service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
