//! Product CRUD handlers.
//!
//! The creation pipeline translates a validated wizard draft into persisted
//! rows: validate presence, resolve the seller, map the form vocabulary
//! onto the storage enumerations, insert the product row, then upload
//! inline photos and attach image rows. Photo handling is explicitly best
//! effort: an individual upload failure is logged and skipped, never
//! rolling back the product row.

use axum::Json;
use axum::extract::{Path, Query, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, instrument, warn};

use vintly_core::{Price, ProductId, ProfileId, map_category, map_condition, map_size};

use crate::catalog::{NewProduct, ProductFilters, ProductImage, ProductRecord};
use crate::error::{AppError, Result};
use crate::objects::DecodedImage;
use crate::state::AppState;

/// Query parameters for the product listing endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category: Option<String>,
    pub size: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

/// Body of the product creation endpoint.
///
/// Field values carry the form vocabulary; mapping onto the storage
/// enumerations happens here, through the shared catalog schema module.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub shipping_weight: String,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub seller_id: Option<String>,
}

/// Query parameters for the scoped delete endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteQuery {
    pub seller_id: ProfileId,
}

/// GET `/api/products` - available products, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    let filters = ProductFilters {
        // "all" is the browse page's no-filter sentinel.
        category: query.category.filter(|c| c != "all"),
        size: query.size,
        min_price: query.min_price,
        max_price: query.max_price,
        ..ProductFilters::default()
    };

    let products = state.catalog().list(&filters).await?;
    Ok(Json(json!({ "products": products })))
}

/// POST `/api/products` - create a product from a listing draft.
#[instrument(skip(state, body), fields(title = %body.title, photos = body.photos.len()))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProduct>,
) -> Result<Json<Value>> {
    // 1. Required fields. A zero price is treated the same as an absent
    // one, matching the form's notion of "no price entered yet".
    if body.title.trim().is_empty()
        || body.category.trim().is_empty()
        || body.size.trim().is_empty()
        || body.condition.trim().is_empty()
    {
        return Err(AppError::MissingFields);
    }
    let Some(price) = body.price.filter(|p| !p.amount().is_zero()) else {
        return Err(AppError::MissingFields);
    };

    // 2. Resolve the seller: the provided id, else the first available
    // profile (demo fallback for the unimplemented auth story).
    let seller_id = resolve_seller(&state, body.seller_id.as_deref()).await?;

    // 3. Map the form vocabulary onto the storage enumerations.
    let new = NewProduct {
        seller_id,
        title: body.title.trim().to_owned(),
        description: none_if_empty(&body.description),
        price: price.amount(),
        category: map_category(&body.category),
        size: map_size(&body.size),
        condition: map_condition(&body.condition),
        brand: none_if_empty(&body.brand),
        color: none_if_empty(&body.color),
        shipping_weight: body.shipping_weight.parse().unwrap_or_default(),
    };

    // 4. Insert the product row.
    let mut product = state.catalog().insert_product(new).await?;

    // 5. Upload inline photos, pass hosted URLs through, keep original
    // order. Individual failures are skipped.
    let images = store_photos(&state, product.id, &body.photos).await;

    // 6. Attach image rows. The product row stands even if this fails.
    if !images.is_empty()
        && let Err(err) = state.catalog().insert_images(product.id, &images).await
    {
        error!(%err, product_id = %product.id, "failed to insert image rows");
    }
    product.images = images;

    Ok(Json(json!({ "success": true, "product": product })))
}

/// GET `/api/products/{id}` - product detail.
///
/// Reading a product bumps its view counter as a fire-and-forget side
/// effect off the response path.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductRecord>> {
    let product = state
        .catalog()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    let catalog = state.catalog().clone();
    tokio::spawn(async move {
        if let Err(err) = catalog.increment_views(id).await {
            warn!(%err, product_id = %id, "failed to increment view counter");
        }
    });

    Ok(Json(product))
}

/// DELETE `/api/products/{id}?sellerId=` - seller-scoped delete.
///
/// Zero rows affected (unknown id, or a different owner) is reported the
/// same as a successful delete.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Value>> {
    let removed = state.catalog().delete(id, query.seller_id).await?;
    Ok(Json(json!({ "success": true, "deleted": removed })))
}

/// Resolve the seller for a new product.
async fn resolve_seller(state: &AppState, seller_id: Option<&str>) -> Result<ProfileId> {
    if let Some(raw) = seller_id {
        return raw
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Invalid seller id: {raw}")));
    }
    state
        .catalog()
        .first_profile()
        .await?
        .ok_or(AppError::NoSellerProfile)
}

/// Upload each inline photo and collect public URLs in original order.
///
/// Already-hosted URLs pass straight through. Upload failures are logged
/// and skipped; the order index reflects the surviving set.
async fn store_photos(state: &AppState, product_id: ProductId, photos: &[String]) -> Vec<ProductImage> {
    let mut urls = Vec::with_capacity(photos.len());
    for (index, photo) in photos.iter().enumerate() {
        if photo.starts_with("data:") {
            match upload_photo(state, product_id, index, photo).await {
                Ok(url) => urls.push(url),
                Err(err) => {
                    warn!(%err, product_id = %product_id, index, "skipping failed photo upload");
                }
            }
        } else {
            urls.push(photo.clone());
        }
    }
    urls.into_iter()
        .enumerate()
        .map(|(index, url)| ProductImage {
            url,
            order_index: index as i32,
        })
        .collect()
}

async fn upload_photo(
    state: &AppState,
    product_id: ProductId,
    index: usize,
    photo: &str,
) -> std::result::Result<String, crate::objects::ObjectStoreError> {
    let image = DecodedImage::from_data_uri(photo)?;
    let key = format!(
        "{product_id}/{index}_{}.{}",
        chrono::Utc::now().timestamp_millis(),
        image.format
    );
    state.objects().upload(&key, &image).await
}

fn none_if_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
