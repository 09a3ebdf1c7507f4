//! Favorites store: products the user has saved, with set semantics.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use vintly_core::{EntityId, Price};

use crate::storage::{StorageEngine, keys, now_millis};
use crate::sync::{ChangeBus, StoreEvent};

use super::{read_collection, write_collection};

/// A lightweight snapshot of a saved product.
///
/// Carries just enough denormalized display data to render a card without a
/// join; `saved_at` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteProduct {
    pub id: EntityId,
    pub title: String,
    pub price: Price,
    pub brand: String,
    pub image_url: String,
    pub size: String,
    pub condition: String,
    pub saved_at: i64,
}

/// Input for saving a favorite; `saved_at` is stamped by the store.
#[derive(Debug, Clone)]
pub struct NewFavorite {
    pub id: EntityId,
    pub title: String,
    pub price: Price,
    pub brand: String,
    pub image_url: String,
    pub size: String,
    pub condition: String,
}

impl NewFavorite {
    fn into_favorite(self) -> FavoriteProduct {
        FavoriteProduct {
            id: self.id,
            title: self.title,
            price: self.price,
            brand: self.brand,
            image_url: self.image_url,
            size: self.size,
            condition: self.condition,
            saved_at: now_millis(),
        }
    }
}

/// Repository for the saved-products collection.
///
/// The store enforces set semantics keyed by product id: at most one entry
/// per id, adds of an existing id are no-ops.
#[derive(Clone)]
pub struct FavoritesStore {
    engine: Arc<dyn StorageEngine>,
    bus: ChangeBus,
}

impl FavoritesStore {
    /// Create a favorites store over the given engine and bus.
    #[must_use]
    pub fn new(engine: Arc<dyn StorageEngine>, bus: ChangeBus) -> Self {
        Self { engine, bus }
    }

    /// All favorites, newest first.
    #[must_use]
    pub fn all(&self) -> Vec<FavoriteProduct> {
        read_collection(self.engine.as_ref(), keys::FAVORITES)
    }

    /// Whether a product is currently saved.
    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.all().iter().any(|f| &f.id == id)
    }

    /// Number of saved products.
    #[must_use]
    pub fn count(&self) -> usize {
        self.all().len()
    }

    /// Save a product. Adding an id that is already saved is a no-op.
    pub fn add(&self, product: NewFavorite) {
        let mut favorites = self.all();
        if favorites.iter().any(|f| f.id == product.id) {
            return;
        }

        favorites.insert(0, product.into_favorite());
        write_collection(self.engine.as_ref(), keys::FAVORITES, &favorites);
        self.bus.publish(StoreEvent::FavoritesChanged);
    }

    /// Unsave a product. Removing an id that is not saved is not an error.
    pub fn remove(&self, id: &EntityId) {
        let mut favorites = self.all();
        favorites.retain(|f| &f.id != id);
        write_collection(self.engine.as_ref(), keys::FAVORITES, &favorites);
        self.bus.publish(StoreEvent::FavoritesChanged);
    }

    /// Flip membership for a product without pre-checking state.
    ///
    /// Returns the resulting membership: `true` if the product is now
    /// saved, `false` if it was just removed.
    pub fn toggle(&self, product: NewFavorite) -> bool {
        if self.contains(&product.id) {
            self.remove(&product.id);
            false
        } else {
            self.add(product);
            true
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> FavoritesStore {
        let bus = ChangeBus::new();
        FavoritesStore::new(Arc::new(MemoryStorage::new(bus.clone())), bus)
    }

    fn sample(id: &str) -> NewFavorite {
        NewFavorite {
            id: EntityId::new(id),
            title: "Chanel Classic Flap".to_owned(),
            price: Price::parse("4850").unwrap(),
            brand: "Chanel".to_owned(),
            image_url: "https://cdn.example.com/flap.jpg".to_owned(),
            size: "One Size".to_owned(),
            condition: "good".to_owned(),
        }
    }

    #[test]
    fn test_add_then_contains() {
        let store = store();
        store.add(sample("p1"));

        assert!(store.contains(&EntityId::new("p1")));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let store = store();
        store.add(sample("p1"));
        store.add(sample("p1"));

        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_newest_first() {
        let store = store();
        store.add(sample("p1"));
        store.add(sample("p2"));

        let ids: Vec<_> = store
            .all()
            .into_iter()
            .map(|f| f.id.as_str().to_owned())
            .collect();
        assert_eq!(ids, ["p2", "p1"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = store();
        store.add(sample("p1"));

        store.remove(&EntityId::new("p1"));
        let after_first = store.all();
        store.remove(&EntityId::new("p1"));

        assert_eq!(store.all(), after_first);
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_toggle_reports_membership() {
        let store = store();

        assert!(store.toggle(sample("p1")));
        assert!(store.contains(&EntityId::new("p1")));

        assert!(!store.toggle(sample("p1")));
        assert!(!store.contains(&EntityId::new("p1")));
    }

    #[test]
    fn test_double_toggle_restores_collection_by_value() {
        let store = store();
        store.add(sample("p0"));
        let before = store.all();

        store.toggle(sample("p1"));
        store.toggle(sample("p1"));

        assert_eq!(store.all(), before);
    }

    #[test]
    fn test_mutations_publish_change_events() {
        let bus = ChangeBus::new();
        let store = FavoritesStore::new(Arc::new(MemoryStorage::new(bus.clone())), bus.clone());
        let mut rx = bus.subscribe();

        store.add(sample("p1"));

        let mut saw = false;
        while let Ok(event) = rx.try_recv() {
            if event == StoreEvent::FavoritesChanged {
                saw = true;
            }
        }
        assert!(saw);
    }
}
