//! Demo data seeding.
//!
//! Ensures the demo seller profile exists and inserts the fixture catalog
//! the browse page ships with. Idempotent: a catalog that already has
//! products is left untouched.

use rust_decimal::Decimal;
use uuid::Uuid;

use vintly_core::{Category, ProfileId, ShippingWeight};

use crate::catalog::{Catalog, CatalogError, NewProduct, ProductFilters, ProductImage};

/// Fixed id of the demo seller profile, stand-in for real authentication.
pub const DEMO_SELLER_UUID: Uuid = Uuid::from_u128(1);

/// Username of the demo seller profile.
pub const DEMO_SELLER_USERNAME: &str = "demo_seller";

/// Result of a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Products inserted by this run.
    pub inserted: usize,
    /// True when the catalog already had products and was left untouched.
    pub skipped: bool,
}

struct Fixture {
    title: &'static str,
    price: i64,
    category: Category,
    size: &'static str,
    condition: &'static str,
    brand: &'static str,
    color: &'static str,
    image_url: &'static str,
}

const FIXTURES: [Fixture; 7] = [
    Fixture {
        title: "Chanel Classic Flap Bag Medium Caviar",
        price: 4850,
        category: Category::Bags,
        size: "ONE_SIZE",
        condition: "like_new",
        brand: "Chanel",
        color: "Black",
        image_url: "https://images.unsplash.com/photo-1548036328-c9fa89d128fa?w=600&h=800&fit=crop",
    },
    Fixture {
        title: "Dior Bar Jacket Wool Silk Blend",
        price: 2890,
        category: Category::Outerwear,
        size: "S",
        condition: "good",
        brand: "Dior",
        color: "Navy",
        image_url: "https://images.unsplash.com/photo-1591047139829-d91aecb6caea?w=600&h=800&fit=crop",
    },
    Fixture {
        title: "Hermès Birkin 30 Togo Leather",
        price: 12500,
        category: Category::Bags,
        size: "ONE_SIZE",
        condition: "good",
        brand: "Hermès",
        color: "Gold",
        image_url: "https://images.unsplash.com/photo-1584917865442-de89df76afd3?w=600&h=800&fit=crop",
    },
    Fixture {
        title: "Valentino Haute Couture Gown Silk",
        price: 8900,
        category: Category::Dresses,
        size: "XS",
        condition: "like_new",
        brand: "Valentino",
        color: "Red",
        image_url: "https://images.unsplash.com/photo-1566174053879-31528523f8ae?w=600&h=800&fit=crop",
    },
    Fixture {
        title: "Louboutin So Kate 120mm Patent",
        price: 595,
        category: Category::Shoes,
        size: "M",
        condition: "fair",
        brand: "Christian Louboutin",
        color: "Black",
        image_url: "https://images.unsplash.com/photo-1543163521-1bf539c55dd2?w=600&h=800&fit=crop",
    },
    Fixture {
        title: "Gucci GG Marmont Velvet Mini Bag",
        price: 1290,
        category: Category::Bags,
        size: "ONE_SIZE",
        condition: "good",
        brand: "Gucci",
        color: "Pink",
        image_url: "https://images.unsplash.com/photo-1566150905458-1bf1fc113f0d?w=600&h=800&fit=crop",
    },
    Fixture {
        title: "Balmain Embellished Tweed Blazer",
        price: 2450,
        category: Category::Outerwear,
        size: "S",
        condition: "like_new",
        brand: "Balmain",
        color: "White",
        image_url: "https://images.unsplash.com/photo-1594938298603-c8148c4dae35?w=600&h=800&fit=crop",
    },
];

/// Seed the demo seller profile and the fixture catalog.
///
/// # Errors
///
/// Returns `CatalogError` if a catalog operation fails.
pub async fn seed(catalog: &Catalog) -> Result<SeedSummary, CatalogError> {
    let seller = ProfileId::new(DEMO_SELLER_UUID);
    catalog.ensure_profile(seller, DEMO_SELLER_USERNAME).await?;

    if !catalog.list(&ProductFilters::default()).await?.is_empty() {
        tracing::info!("catalog already has products, skipping fixture insert");
        return Ok(SeedSummary {
            inserted: 0,
            skipped: true,
        });
    }

    // Insert in reverse so the first fixture ends up newest.
    let mut inserted = 0;
    for fixture in FIXTURES.iter().rev() {
        let product = catalog
            .insert_product(NewProduct {
                seller_id: seller,
                title: fixture.title.to_owned(),
                description: None,
                price: Decimal::from(fixture.price),
                category: fixture.category,
                size: fixture.size.to_owned(),
                condition: fixture.condition.to_owned(),
                brand: Some(fixture.brand.to_owned()),
                color: Some(fixture.color.to_owned()),
                shipping_weight: ShippingWeight::Medium,
            })
            .await?;
        catalog
            .insert_images(
                product.id,
                &[ProductImage {
                    url: fixture.image_url.to_owned(),
                    order_index: 0,
                }],
            )
            .await?;
        inserted += 1;
    }

    tracing::info!(inserted, "fixture catalog seeded");
    Ok(SeedSummary {
        inserted,
        skipped: false,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;

    #[tokio::test]
    async fn test_seed_inserts_fixtures_once() {
        let catalog = Catalog::Memory(MemoryCatalog::new());

        let first = seed(&catalog).await.unwrap();
        assert_eq!(first.inserted, FIXTURES.len());
        assert!(!first.skipped);

        let second = seed(&catalog).await.unwrap();
        assert_eq!(second.inserted, 0);
        assert!(second.skipped);

        let products = catalog.list(&ProductFilters::default()).await.unwrap();
        assert_eq!(products.len(), FIXTURES.len());
    }

    #[tokio::test]
    async fn test_seed_registers_demo_profile() {
        let catalog = Catalog::Memory(MemoryCatalog::new());
        seed(&catalog).await.unwrap();

        assert_eq!(
            catalog.first_profile().await.unwrap(),
            Some(ProfileId::new(DEMO_SELLER_UUID))
        );
    }

    #[tokio::test]
    async fn test_seeded_catalog_is_newest_first() {
        let catalog = Catalog::Memory(MemoryCatalog::new());
        seed(&catalog).await.unwrap();

        let products = catalog.list(&ProductFilters::default()).await.unwrap();
        assert_eq!(products[0].title, FIXTURES[0].title);
    }
}
