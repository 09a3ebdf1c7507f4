//! The product catalog: the relational side of the service.
//!
//! [`Catalog`] is the repository seam injected into handlers. Two backends
//! implement it: [`pg::PgCatalog`] against `PostgreSQL` (the hosted store)
//! and [`memory::MemoryCatalog`] for demo mode and tests. Handlers never
//! know which one they talk to.

pub mod memory;
pub mod pg;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use vintly_core::{Category, ProductId, ProductStatus, ProfileId, ShippingWeight};

pub use memory::MemoryCatalog;
pub use pg::PgCatalog;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// A persisted product row with its images joined in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub seller_id: ProfileId,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Category,
    pub size: String,
    pub condition: String,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub status: ProductStatus,
    pub shipping_weight: ShippingWeight,
    pub views_count: i32,
    pub likes_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

/// An image association row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    pub order_index: i32,
}

/// Input for a new product row. Vocabulary is already mapped onto the
/// storage enumerations by the handler.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub seller_id: ProfileId,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Category,
    pub size: String,
    pub condition: String,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub shipping_weight: ShippingWeight,
}

/// Optional listing filters, combined with logical AND.
///
/// `category`, `size`, `brand`, and `condition` compare against the stored
/// tokens; prices are inclusive bounds.
#[derive(Debug, Clone, Default)]
pub struct ProductFilters {
    pub category: Option<String>,
    pub size: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub brand: Option<String>,
    pub condition: Option<String>,
}

impl ProductRecord {
    fn matches(&self, filters: &ProductFilters) -> bool {
        if let Some(category) = &filters.category
            && self.category.as_str() != category
        {
            return false;
        }
        if let Some(size) = &filters.size
            && &self.size != size
        {
            return false;
        }
        if let Some(min) = filters.min_price
            && self.price < min
        {
            return false;
        }
        if let Some(max) = filters.max_price
            && self.price > max
        {
            return false;
        }
        if let Some(brand) = &filters.brand
            && self.brand.as_deref() != Some(brand.as_str())
        {
            return false;
        }
        if let Some(condition) = &filters.condition
            && &self.condition != condition
        {
            return false;
        }
        true
    }
}

/// The catalog backend selected at startup.
#[derive(Debug, Clone)]
pub enum Catalog {
    /// `PostgreSQL`-backed catalog (hosted store).
    Pg(PgCatalog),
    /// In-memory catalog (demo mode and tests).
    Memory(MemoryCatalog),
}

impl Catalog {
    /// Insert a product row and return it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the insert fails.
    pub async fn insert_product(&self, new: NewProduct) -> Result<ProductRecord, CatalogError> {
        match self {
            Self::Pg(pg) => pg.insert_product(new).await,
            Self::Memory(memory) => Ok(memory.insert_product(new)),
        }
    }

    /// Insert image association rows for a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if an insert fails.
    pub async fn insert_images(
        &self,
        product_id: ProductId,
        images: &[ProductImage],
    ) -> Result<(), CatalogError> {
        match self {
            Self::Pg(pg) => pg.insert_images(product_id, images).await,
            Self::Memory(memory) => {
                memory.insert_images(product_id, images);
                Ok(())
            }
        }
    }

    /// Available products, newest first, filters ANDed together.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the query fails or a row fails to decode.
    pub async fn list(&self, filters: &ProductFilters) -> Result<Vec<ProductRecord>, CatalogError> {
        match self {
            Self::Pg(pg) => pg.list(filters).await,
            Self::Memory(memory) => Ok(memory.list(filters)),
        }
    }

    /// Look up a product by id, regardless of status.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the query fails or the row fails to decode.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>, CatalogError> {
        match self {
            Self::Pg(pg) => pg.get(id).await,
            Self::Memory(memory) => Ok(memory.get(id)),
        }
    }

    /// Bump a product's view counter.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the update fails.
    pub async fn increment_views(&self, id: ProductId) -> Result<(), CatalogError> {
        match self {
            Self::Pg(pg) => pg.increment_views(id).await,
            Self::Memory(memory) => {
                memory.increment_views(id);
                Ok(())
            }
        }
    }

    /// Delete a product scoped to its owning seller.
    ///
    /// Returns the number of rows removed; zero when the id does not
    /// resolve or belongs to a different seller, which is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId, seller_id: ProfileId) -> Result<u64, CatalogError> {
        match self {
            Self::Pg(pg) => pg.delete(id, seller_id).await,
            Self::Memory(memory) => Ok(memory.delete(id, seller_id)),
        }
    }

    /// The first registered profile, the demo fallback seller.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the query fails.
    pub async fn first_profile(&self) -> Result<Option<ProfileId>, CatalogError> {
        match self {
            Self::Pg(pg) => pg.first_profile().await,
            Self::Memory(memory) => Ok(memory.first_profile()),
        }
    }

    /// Create a profile if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the insert fails.
    pub async fn ensure_profile(
        &self,
        id: ProfileId,
        username: &str,
    ) -> Result<(), CatalogError> {
        match self {
            Self::Pg(pg) => pg.ensure_profile(id, username).await,
            Self::Memory(memory) => {
                memory.ensure_profile(id, username);
                Ok(())
            }
        }
    }

    /// Readiness probe.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the backend is unreachable.
    pub async fn ping(&self) -> Result<(), CatalogError> {
        match self {
            Self::Pg(pg) => pg.ping().await,
            Self::Memory(_) => Ok(()),
        }
    }
}
