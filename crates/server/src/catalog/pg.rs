//! `PostgreSQL`-backed catalog.
//!
//! Queries are runtime-bound (no compile-time verification) so the crate
//! builds without a live database; row decoding failures surface as
//! [`CatalogError::DataCorruption`]. Tables are defined in
//! `crates/server/migrations/`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use vintly_core::{Category, ProductId, ProductStatus, ProfileId, ShippingWeight};

use super::{CatalogError, NewProduct, ProductFilters, ProductImage, ProductRecord};

/// Repository for the hosted product store.
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    /// Connect with the standard pool defaults.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the connection cannot be
    /// established.
    pub async fn connect(database_url: &SecretString) -> Result<Self, CatalogError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url.expose_secret())
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool (migrations, seeding).
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a product row and return it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the insert fails or the returned row
    /// fails to decode.
    pub async fn insert_product(&self, new: NewProduct) -> Result<ProductRecord, CatalogError> {
        let row = sqlx::query(
            r"
            INSERT INTO products
                (seller_id, title, description, price, category, size,
                 condition, brand, color, status, shipping_weight)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'available', $10)
            RETURNING id, seller_id, title, description, price, category,
                      size, condition, brand, color, status, shipping_weight,
                      views_count, likes_count, created_at, updated_at
            ",
        )
        .bind(new.seller_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.category.as_str())
        .bind(&new.size)
        .bind(&new.condition)
        .bind(&new.brand)
        .bind(&new.color)
        .bind(new.shipping_weight.as_str())
        .fetch_one(&self.pool)
        .await?;

        row_to_product(&row)
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
        for image in images {
            sqlx::query("INSERT INTO images (product_id, url, order_index) VALUES ($1, $2, $3)")
                .bind(product_id)
                .bind(&image.url)
                .bind(image.order_index)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    /// Available products, newest first, filters ANDed together.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the query fails or a row fails to decode.
    pub async fn list(&self, filters: &ProductFilters) -> Result<Vec<ProductRecord>, CatalogError> {
        let mut query = QueryBuilder::new(
            "SELECT id, seller_id, title, description, price, category, size, \
             condition, brand, color, status, shipping_weight, views_count, \
             likes_count, created_at, updated_at \
             FROM products WHERE status = 'available'",
        );
        if let Some(category) = &filters.category {
            query.push(" AND category = ").push_bind(category);
        }
        if let Some(size) = &filters.size {
            query.push(" AND size = ").push_bind(size);
        }
        if let Some(min) = filters.min_price {
            query.push(" AND price >= ").push_bind(min);
        }
        if let Some(max) = filters.max_price {
            query.push(" AND price <= ").push_bind(max);
        }
        if let Some(brand) = &filters.brand {
            query.push(" AND brand = ").push_bind(brand);
        }
        if let Some(condition) = &filters.condition {
            query.push(" AND condition = ").push_bind(condition);
        }
        query.push(" ORDER BY created_at DESC");

        let rows = query.build().fetch_all(&self.pool).await?;
        let mut products = rows
            .iter()
            .map(row_to_product)
            .collect::<Result<Vec<_>, _>>()?;
        self.join_images(&mut products).await?;
        Ok(products)
    }

    /// Look up a product by id, regardless of status.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the query fails or the row fails to decode.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>, CatalogError> {
        let row = sqlx::query(
            r"
            SELECT id, seller_id, title, description, price, category, size,
                   condition, brand, color, status, shipping_weight,
                   views_count, likes_count, created_at, updated_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut products = vec![row_to_product(&row)?];
                self.join_images(&mut products).await?;
                Ok(products.pop())
            }
            None => Ok(None),
        }
    }

    /// Bump a product's view counter.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the update fails.
    pub async fn increment_views(&self, id: ProductId) -> Result<(), CatalogError> {
        sqlx::query(
            "UPDATE products SET views_count = views_count + 1, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Delete a product scoped to its owning seller; returns rows removed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId, seller_id: ProfileId) -> Result<u64, CatalogError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND seller_id = $2")
            .bind(id)
            .bind(seller_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// The first registered profile, the demo fallback seller.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the query fails.
    pub async fn first_profile(&self) -> Result<Option<ProfileId>, CatalogError> {
        let row = sqlx::query("SELECT id FROM profiles ORDER BY created_at LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| ProfileId::new(r.get::<Uuid, _>("id"))))
    }

    /// Create a profile if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the insert fails.
    pub async fn ensure_profile(&self, id: ProfileId, username: &str) -> Result<(), CatalogError> {
        sqlx::query(
            "INSERT INTO profiles (id, username) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .bind(username)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Readiness probe.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Database` if the database is unreachable.
    pub async fn ping(&self) -> Result<(), CatalogError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Attach image rows, ordered by `order_index`, to each product.
    async fn join_images(&self, products: &mut [ProductRecord]) -> Result<(), CatalogError> {
        if products.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = products.iter().map(|p| p.id.as_uuid()).collect();
        let rows = sqlx::query(
            r"
            SELECT product_id, url, order_index
            FROM images
            WHERE product_id = ANY($1)
            ORDER BY order_index
            ",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            let product_id = ProductId::new(row.get::<Uuid, _>("product_id"));
            if let Some(product) = products.iter_mut().find(|p| p.id == product_id) {
                product.images.push(ProductImage {
                    url: row.get("url"),
                    order_index: row.get("order_index"),
                });
            }
        }
        Ok(())
    }
}

/// Decode a product row, translating enum columns through the catalog
/// schema module.
fn row_to_product(row: &PgRow) -> Result<ProductRecord, CatalogError> {
    let category: String = row.get("category");
    let status: String = row.get("status");
    let shipping_weight: String = row.get("shipping_weight");

    Ok(ProductRecord {
        id: ProductId::new(row.get::<Uuid, _>("id")),
        seller_id: ProfileId::new(row.get::<Uuid, _>("seller_id")),
        title: row.get("title"),
        description: row.get("description"),
        price: row.get::<Decimal, _>("price"),
        category: category
            .parse::<Category>()
            .map_err(CatalogError::DataCorruption)?,
        size: row.get("size"),
        condition: row.get("condition"),
        brand: row.get("brand"),
        color: row.get("color"),
        status: status
            .parse::<ProductStatus>()
            .map_err(CatalogError::DataCorruption)?,
        shipping_weight: shipping_weight
            .parse::<ShippingWeight>()
            .map_err(CatalogError::DataCorruption)?,
        views_count: row.get("views_count"),
        likes_count: row.get("likes_count"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
        images: Vec::new(),
    })
}
