//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::ServerConfig;
use crate::enhance::Enhancer;
use crate::objects::ObjectStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the configuration and the three
/// backend seams: the product catalog, the photo object store, and the
/// enhancement service. Each seam is selected at startup from
/// configuration, so handlers never know whether they run against hosted
/// services or the demo-mode fallbacks.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    catalog: Catalog,
    objects: ObjectStore,
    enhancer: Enhancer,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        catalog: Catalog,
        objects: ObjectStore,
        enhancer: Enhancer,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                objects,
                enhancer,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the photo object store.
    #[must_use]
    pub fn objects(&self) -> &ObjectStore {
        &self.inner.objects
    }

    /// Get a reference to the photo enhancement service.
    #[must_use]
    pub fn enhancer(&self) -> &Enhancer {
        &self.inner.enhancer
    }
}
