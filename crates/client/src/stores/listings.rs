//! Listings store: seller-authored items awaiting or finding buyers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vintly_core::{
    Condition, ListingCategory, ListingId, ListingStatus, Price, ShippingWeight, Size,
};

use crate::storage::{StorageEngine, generate_id, keys};
use crate::sync::{ChangeBus, StoreEvent};

use super::{read_collection, write_collection};

/// A seller-authored listing as persisted locally.
///
/// `id` is assigned at save time and never changes; the collection is kept
/// newest-first, an ordering "recently listed" views rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub photos: Vec<String>,
    pub title: String,
    pub description: String,
    pub category: ListingCategory,
    pub size: Size,
    pub condition: Condition,
    pub brand: String,
    pub color: String,
    pub price: Price,
    pub shipping_weight: ShippingWeight,
    pub allow_pickup: bool,
    pub allow_delivery: bool,
    pub shipping_included: bool,
    pub pickup_location: String,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub seller_name: String,
    pub seller_avatar: String,
    pub likes: u32,
}

/// Input for a new listing; id, status, timestamps, and seller display
/// fields are filled in by the store.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub photos: Vec<String>,
    pub title: String,
    pub description: String,
    pub category: ListingCategory,
    pub size: Size,
    pub condition: Condition,
    pub brand: String,
    pub color: String,
    pub price: Price,
    pub shipping_weight: ShippingWeight,
    pub allow_pickup: bool,
    pub allow_delivery: bool,
    pub shipping_included: bool,
    pub pickup_location: String,
}

/// A shallow-merge patch: present fields replace the stored ones wholesale
/// (a new `photos` vector replaces the old one, it is not spliced).
#[derive(Debug, Clone, Default)]
pub struct ListingPatch {
    pub photos: Option<Vec<String>>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub status: Option<ListingStatus>,
    pub likes: Option<u32>,
}

/// Repository for the locally-persisted listings collection.
#[derive(Clone)]
pub struct ListingsStore {
    engine: Arc<dyn StorageEngine>,
    bus: ChangeBus,
}

impl ListingsStore {
    /// Create a listings store over the given engine and bus.
    #[must_use]
    pub fn new(engine: Arc<dyn StorageEngine>, bus: ChangeBus) -> Self {
        Self { engine, bus }
    }

    /// All listings, newest first. Missing or malformed storage yields an
    /// empty list, never an error.
    #[must_use]
    pub fn all(&self) -> Vec<Listing> {
        read_collection(self.engine.as_ref(), keys::LISTINGS)
    }

    /// Look up a single listing by id.
    #[must_use]
    pub fn get(&self, id: &ListingId) -> Option<Listing> {
        self.all().into_iter().find(|l| &l.id == id)
    }

    /// Save a new listing: assigns a fresh unique id, stamps the creation
    /// time, and prepends so the collection stays newest-first.
    pub fn save(&self, new: NewListing) -> Listing {
        let listing = Listing {
            id: ListingId::new(generate_id("listing")),
            photos: new.photos,
            title: new.title,
            description: new.description,
            category: new.category,
            size: new.size,
            condition: new.condition,
            brand: new.brand,
            color: new.color,
            price: new.price,
            shipping_weight: new.shipping_weight,
            allow_pickup: new.allow_pickup,
            allow_delivery: new.allow_delivery,
            shipping_included: new.shipping_included,
            pickup_location: new.pickup_location,
            status: ListingStatus::Available,
            created_at: Utc::now(),
            // Seller display fields would come from auth in a real app.
            seller_name: "You".to_owned(),
            seller_avatar: String::new(),
            likes: 0,
        };

        let mut listings = self.all();
        listings.insert(0, listing.clone());
        write_collection(self.engine.as_ref(), keys::LISTINGS, &listings);
        self.bus.publish(StoreEvent::ListingsChanged);

        listing
    }

    /// Shallow-merge `patch` into the listing with `id`.
    ///
    /// Returns the updated listing, or `None` without writing when the id
    /// does not resolve.
    pub fn update(&self, id: &ListingId, patch: ListingPatch) -> Option<Listing> {
        let mut listings = self.all();
        let listing = listings.iter_mut().find(|l| &l.id == id)?;

        if let Some(photos) = patch.photos {
            listing.photos = photos;
        }
        if let Some(title) = patch.title {
            listing.title = title;
        }
        if let Some(description) = patch.description {
            listing.description = description;
        }
        if let Some(price) = patch.price {
            listing.price = price;
        }
        if let Some(status) = patch.status {
            listing.status = status;
        }
        if let Some(likes) = patch.likes {
            listing.likes = likes;
        }
        let updated = listing.clone();

        write_collection(self.engine.as_ref(), keys::LISTINGS, &listings);
        self.bus.publish(StoreEvent::ListingsChanged);

        Some(updated)
    }

    /// Remove the listing with `id`. Removing an id that is not present is
    /// not an error; the (unchanged) collection is still written back.
    pub fn delete(&self, id: &ListingId) {
        let mut listings = self.all();
        listings.retain(|l| &l.id != id);
        write_collection(self.engine.as_ref(), keys::LISTINGS, &listings);
        self.bus.publish(StoreEvent::ListingsChanged);
    }

    /// Drop the whole collection.
    pub fn clear(&self) {
        self.engine.remove(keys::LISTINGS);
        self.bus.publish(StoreEvent::ListingsChanged);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> ListingsStore {
        let bus = ChangeBus::new();
        ListingsStore::new(Arc::new(MemoryStorage::new(bus.clone())), bus)
    }

    fn sample(title: &str) -> NewListing {
        NewListing {
            photos: vec!["https://cdn.example.com/scarf.jpg".to_owned()],
            title: title.to_owned(),
            description: "Hand-rolled silk".to_owned(),
            category: ListingCategory::Accessories,
            size: Size::OneSize,
            condition: Condition::Good,
            brand: "Hermès".to_owned(),
            color: "orange".to_owned(),
            price: Price::parse("120").unwrap(),
            shipping_weight: ShippingWeight::Small,
            allow_pickup: true,
            allow_delivery: false,
            shipping_included: false,
            pickup_location: String::new(),
        }
    }

    #[test]
    fn test_empty_store_yields_empty_list() {
        assert!(store().all().is_empty());
    }

    #[test]
    fn test_malformed_collection_degrades_to_empty() {
        let bus = ChangeBus::new();
        let engine = Arc::new(MemoryStorage::new(bus.clone()));
        engine.set(keys::LISTINGS, "{not json");
        let store = ListingsStore::new(engine, bus);

        assert!(store.all().is_empty());
    }

    #[test]
    fn test_save_assigns_distinct_ids() {
        let store = store();
        let mut ids = std::collections::HashSet::new();
        for i in 0..50 {
            let listing = store.save(sample(&format!("Item {i}")));
            assert!(ids.insert(listing.id));
        }
    }

    #[test]
    fn test_newest_first_ordering() {
        let store = store();
        store.save(sample("A"));
        store.save(sample("B"));

        let titles: Vec<_> = store.all().into_iter().map(|l| l.title).collect();
        assert_eq!(titles, ["B", "A"]);
    }

    #[test]
    fn test_save_defaults() {
        let store = store();
        let listing = store.save(sample("Silk Scarf"));

        assert_eq!(listing.status, ListingStatus::Available);
        assert_eq!(listing.seller_name, "You");
        assert_eq!(listing.likes, 0);
    }

    #[test]
    fn test_update_merges_and_persists() {
        let store = store();
        let listing = store.save(sample("Silk Scarf"));

        let updated = store
            .update(
                &listing.id,
                ListingPatch {
                    status: Some(ListingStatus::Sold),
                    likes: Some(3),
                    ..ListingPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.status, ListingStatus::Sold);
        assert_eq!(updated.likes, 3);
        // Untouched fields survive the merge.
        assert_eq!(updated.title, "Silk Scarf");
        assert_eq!(store.get(&listing.id).unwrap(), updated);
    }

    #[test]
    fn test_update_missing_id_writes_nothing() {
        let store = store();
        store.save(sample("Silk Scarf"));

        let missing = ListingId::new("listing_0_missing");
        assert!(store.update(&missing, ListingPatch::default()).is_none());
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = store();
        let listing = store.save(sample("Silk Scarf"));

        store.delete(&listing.id);
        let after_first = store.all();
        store.delete(&listing.id);

        assert_eq!(store.all(), after_first);
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_mutations_publish_change_events() {
        let bus = ChangeBus::new();
        let store = ListingsStore::new(Arc::new(MemoryStorage::new(bus.clone())), bus.clone());
        let mut rx = bus.subscribe();

        let listing = store.save(sample("Silk Scarf"));

        let mut saw_symbolic = false;
        while let Ok(event) = rx.try_recv() {
            if event == StoreEvent::ListingsChanged {
                saw_symbolic = true;
            }
        }
        assert!(saw_symbolic);

        store.delete(&listing.id);
        let mut saw_after_delete = false;
        while let Ok(event) = rx.try_recv() {
            if event == StoreEvent::ListingsChanged {
                saw_after_delete = true;
            }
        }
        assert!(saw_after_delete);
    }

    #[test]
    fn test_listing_json_layout() {
        let store = store();
        store.save(sample("Silk Scarf"));

        let json = serde_json::to_value(store.all()).unwrap();
        let first = &json[0];
        assert!(first.get("shippingWeight").is_some());
        assert!(first.get("allowPickup").is_some());
        assert!(first.get("createdAt").is_some());
        assert_eq!(first["sellerName"], "You");
    }
}
