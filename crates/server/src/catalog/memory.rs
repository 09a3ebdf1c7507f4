//! In-memory catalog for demo mode and tests.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use vintly_core::{ProductId, ProductStatus, ProfileId};

use super::{NewProduct, ProductFilters, ProductImage, ProductRecord};

/// A catalog held entirely in process memory.
///
/// Rows live in insertion order, newest first, matching the
/// `created_at DESC` ordering of the database-backed catalog. State is
/// shared across clones, so the server and a seeding step can point at the
/// same instance.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    products: Vec<ProductRecord>,
    // Registration order; nothing in the API reads profile usernames back.
    profiles: Vec<ProfileId>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a product row and return it.
    pub fn insert_product(&self, new: NewProduct) -> ProductRecord {
        let now = Utc::now();
        let record = ProductRecord {
            id: ProductId::generate(),
            seller_id: new.seller_id,
            title: new.title,
            description: new.description,
            price: new.price,
            category: new.category,
            size: new.size,
            condition: new.condition,
            brand: new.brand,
            color: new.color,
            status: ProductStatus::Available,
            shipping_weight: new.shipping_weight,
            views_count: 0,
            likes_count: 0,
            created_at: now,
            updated_at: now,
            images: Vec::new(),
        };
        self.write().products.insert(0, record.clone());
        record
    }

    /// Attach image rows to a product.
    pub fn insert_images(&self, product_id: ProductId, images: &[ProductImage]) {
        let mut inner = self.write();
        if let Some(product) = inner.products.iter_mut().find(|p| p.id == product_id) {
            product.images.extend_from_slice(images);
        }
    }

    /// Available products, newest first, filters ANDed together.
    #[must_use]
    pub fn list(&self, filters: &ProductFilters) -> Vec<ProductRecord> {
        self.read()
            .products
            .iter()
            .filter(|p| p.status == ProductStatus::Available && p.matches(filters))
            .cloned()
            .collect()
    }

    /// Look up a product by id, regardless of status.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<ProductRecord> {
        self.read().products.iter().find(|p| p.id == id).cloned()
    }

    /// Bump a product's view counter.
    pub fn increment_views(&self, id: ProductId) {
        let mut inner = self.write();
        if let Some(product) = inner.products.iter_mut().find(|p| p.id == id) {
            product.views_count += 1;
            product.updated_at = Utc::now();
        }
    }

    /// Delete a product scoped to its owning seller; returns rows removed.
    pub fn delete(&self, id: ProductId, seller_id: ProfileId) -> u64 {
        let mut inner = self.write();
        let before = inner.products.len();
        inner
            .products
            .retain(|p| !(p.id == id && p.seller_id == seller_id));
        (before - inner.products.len()) as u64
    }

    /// The first registered profile, the demo fallback seller.
    #[must_use]
    pub fn first_profile(&self) -> Option<ProfileId> {
        self.read().profiles.first().copied()
    }

    /// Create a profile if it does not exist yet.
    pub fn ensure_profile(&self, id: ProfileId, username: &str) {
        let mut inner = self.write();
        if !inner.profiles.contains(&id) {
            tracing::debug!(%id, username, "registering profile");
            inner.profiles.push(id);
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use vintly_core::{Category, ShippingWeight};

    use super::*;

    fn new_product(seller: ProfileId, title: &str, price: i64) -> NewProduct {
        NewProduct {
            seller_id: seller,
            title: title.to_owned(),
            description: None,
            price: Decimal::from(price),
            category: Category::Bags,
            size: "ONE_SIZE".to_owned(),
            condition: "good".to_owned(),
            brand: None,
            color: None,
            shipping_weight: ShippingWeight::Medium,
        }
    }

    #[test]
    fn test_list_is_newest_first() {
        let catalog = MemoryCatalog::new();
        let seller = ProfileId::generate();
        catalog.insert_product(new_product(seller, "first", 100));
        catalog.insert_product(new_product(seller, "second", 200));

        let products = catalog.list(&ProductFilters::default());
        assert_eq!(products[0].title, "second");
        assert_eq!(products[1].title, "first");
    }

    #[test]
    fn test_price_filters_are_inclusive_bounds() {
        let catalog = MemoryCatalog::new();
        let seller = ProfileId::generate();
        for price in [595, 1290, 4850] {
            catalog.insert_product(new_product(seller, &format!("item-{price}"), price));
        }

        let filters = ProductFilters {
            min_price: Some(Decimal::from(1000)),
            max_price: Some(Decimal::from(3000)),
            ..ProductFilters::default()
        };
        let products = catalog.list(&filters);

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "item-1290");
    }

    #[test]
    fn test_brand_and_condition_filters() {
        let catalog = MemoryCatalog::new();
        let seller = ProfileId::generate();
        let mut gucci = new_product(seller, "gucci-bag", 1290);
        gucci.brand = Some("Gucci".to_owned());
        catalog.insert_product(gucci);
        let mut chanel = new_product(seller, "chanel-bag", 4850);
        chanel.brand = Some("Chanel".to_owned());
        chanel.condition = "like_new".to_owned();
        catalog.insert_product(chanel);

        let by_brand = catalog.list(&ProductFilters {
            brand: Some("Gucci".to_owned()),
            ..ProductFilters::default()
        });
        assert_eq!(by_brand.len(), 1);
        assert_eq!(by_brand[0].title, "gucci-bag");

        let by_condition = catalog.list(&ProductFilters {
            condition: Some("like_new".to_owned()),
            ..ProductFilters::default()
        });
        assert_eq!(by_condition.len(), 1);
        assert_eq!(by_condition[0].title, "chanel-bag");
    }

    #[test]
    fn test_delete_is_scoped_to_owner() {
        let catalog = MemoryCatalog::new();
        let owner = ProfileId::generate();
        let other = ProfileId::generate();
        let product = catalog.insert_product(new_product(owner, "scoped", 100));

        assert_eq!(catalog.delete(product.id, other), 0);
        assert!(catalog.get(product.id).is_some());
        assert_eq!(catalog.delete(product.id, owner), 1);
        assert!(catalog.get(product.id).is_none());
    }

    #[test]
    fn test_increment_views() {
        let catalog = MemoryCatalog::new();
        let product = catalog.insert_product(new_product(ProfileId::generate(), "viewed", 100));

        catalog.increment_views(product.id);
        catalog.increment_views(product.id);

        assert_eq!(catalog.get(product.id).unwrap().views_count, 2);
    }

    #[test]
    fn test_ensure_profile_is_idempotent() {
        let catalog = MemoryCatalog::new();
        let id = ProfileId::generate();

        catalog.ensure_profile(id, "demo_seller");
        catalog.ensure_profile(id, "demo_seller");

        assert_eq!(catalog.first_profile(), Some(id));
    }

    #[test]
    fn test_images_join_onto_product() {
        let catalog = MemoryCatalog::new();
        let product = catalog.insert_product(new_product(ProfileId::generate(), "pictured", 100));

        catalog.insert_images(
            product.id,
            &[ProductImage {
                url: "https://example.com/a.jpg".to_owned(),
                order_index: 0,
            }],
        );

        assert_eq!(catalog.get(product.id).unwrap().images.len(), 1);
    }
}
