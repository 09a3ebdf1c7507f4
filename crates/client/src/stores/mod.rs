//! Local persistence stores, one repository per entity family.
//!
//! Each store wraps a single named collection in the storage engine and
//! publishes a symbolic change event after every successful mutation, so
//! sibling views never depend on call sites remembering to notify.
//!
//! Failure policy: store reads never error across the public boundary.
//! Missing keys and malformed content degrade to the empty collection (a
//! corrupted local cache must never crash presentation code), and write
//! failures are logged inside the engine.

pub mod admin;
pub mod favorites;
pub mod listings;
pub mod messages;
pub mod users;

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::storage::{FileStorage, MemoryStorage, StorageEngine};
use crate::sync::ChangeBus;

pub use admin::{AdminStore, DashboardStats, Order, Seller};
pub use favorites::{FavoriteProduct, FavoritesStore, NewFavorite};
pub use listings::{Listing, ListingPatch, ListingsStore, NewListing};
pub use messages::{Conversation, ConversationSeed, Message, MessageStore, Participant};
pub use users::{AuthError, User, UserPatch, UserStore};

/// The full set of local stores over one shared storage engine and bus.
///
/// This is the composition root for the client data layer: construct one,
/// hand out stores to views, and subscribe to the bus for re-render
/// triggers.
#[derive(Clone)]
pub struct LocalStores {
    engine: Arc<dyn StorageEngine>,
    bus: ChangeBus,
}

impl LocalStores {
    /// Stores backed by files under a profile directory.
    #[must_use]
    pub fn file_backed(dir: impl Into<PathBuf>) -> Self {
        let bus = ChangeBus::new();
        Self {
            engine: Arc::new(FileStorage::new(dir, bus.clone())),
            bus,
        }
    }

    /// Stores backed by process memory (tests, ephemeral sessions).
    #[must_use]
    pub fn in_memory() -> Self {
        let bus = ChangeBus::new();
        Self {
            engine: Arc::new(MemoryStorage::new(bus.clone())),
            bus,
        }
    }

    /// The change bus shared by the engine and every store.
    #[must_use]
    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    /// The listings repository.
    #[must_use]
    pub fn listings(&self) -> ListingsStore {
        ListingsStore::new(Arc::clone(&self.engine), self.bus.clone())
    }

    /// The favorites repository.
    #[must_use]
    pub fn favorites(&self) -> FavoritesStore {
        FavoritesStore::new(Arc::clone(&self.engine), self.bus.clone())
    }

    /// The user accounts and session repository.
    #[must_use]
    pub fn users(&self) -> UserStore {
        UserStore::new(Arc::clone(&self.engine), self.bus.clone())
    }

    /// The admin session repository and dashboard fixtures.
    #[must_use]
    pub fn admin(&self) -> AdminStore {
        AdminStore::new(Arc::clone(&self.engine), self.bus.clone())
    }

    /// The conversations and messages repository.
    #[must_use]
    pub fn messages(&self) -> MessageStore {
        MessageStore::new(Arc::clone(&self.engine), self.bus.clone())
    }
}

/// Deserialize the collection under `key`, degrading to empty on missing or
/// malformed content.
fn read_collection<T: DeserializeOwned>(engine: &dyn StorageEngine, key: &str) -> Vec<T> {
    let Some(raw) = engine.get(key) else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(err) => {
            tracing::error!(key, %err, "malformed stored collection, treating as empty");
            Vec::new()
        }
    }
}

/// Serialize and write the whole collection back under `key` in one call.
fn write_collection<T: Serialize>(engine: &dyn StorageEngine, key: &str, items: &[T]) {
    match serde_json::to_string(items) {
        Ok(raw) => engine.set(key, &raw),
        Err(err) => tracing::error!(key, %err, "failed to serialize collection"),
    }
}

/// Deserialize a single value under `key`, degrading to `None`.
fn read_value<T: DeserializeOwned>(engine: &dyn StorageEngine, key: &str) -> Option<T> {
    let raw = engine.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(key, %err, "malformed stored value, treating as absent");
            None
        }
    }
}

/// Serialize and write a single value under `key`.
fn write_value<T: Serialize>(engine: &dyn StorageEngine, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => engine.set(key, &raw),
        Err(err) => tracing::error!(key, %err, "failed to serialize value"),
    }
}
