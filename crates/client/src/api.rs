//! HTTP client for the remote product service.
//!
//! Used by the wizard's Publish action, the browse page, and the photo
//! enhancement flow. Every method returns a discriminated result; the
//! server's `error` message is surfaced verbatim when present so the UI can
//! show it next to the generic failure banner.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use vintly_core::{Category, Price, ProductId, ProductStatus, ProfileId, ShippingWeight};

use crate::wizard::ListingDraft;

/// Errors from talking to the product service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never completed (network failure, timeout).
    #[error("request failed: {0}")]
    Request(String),
    /// The server answered with an error status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided detail, or a generic fallback.
        message: String,
    },
    /// The server answered 2xx but the body was not the expected shape.
    #[error("unexpected response: {0}")]
    Response(String),
}

/// A product row as returned by the service, images joined in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteProduct {
    pub id: ProductId,
    pub seller_id: ProfileId,
    pub title: String,
    pub description: Option<String>,
    pub price: Price,
    pub category: Category,
    pub size: String,
    pub condition: String,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub status: ProductStatus,
    pub shipping_weight: ShippingWeight,
    pub views_count: i64,
    pub likes_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

/// An image associated with a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    pub order_index: i32,
}

/// The body posted to the product creation endpoint.
///
/// Field values carry the form vocabulary; the service owns the mapping
/// onto its storage enumerations. `price` is the raw text of the price
/// field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub title: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub size: String,
    pub condition: String,
    pub brand: String,
    pub color: String,
    pub shipping_weight: String,
    pub photos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<String>,
}

impl CreateProductRequest {
    /// Serialize a wizard draft into the endpoint shape.
    #[must_use]
    pub fn from_draft(draft: &ListingDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            price: draft.price.clone(),
            category: draft
                .category
                .map(|c| c.as_str().to_owned())
                .unwrap_or_default(),
            size: draft.size.map(|s| s.label().to_owned()).unwrap_or_default(),
            condition: draft
                .condition
                .map(|c| c.as_str().to_owned())
                .unwrap_or_default(),
            brand: draft.brand.clone(),
            color: draft.color.clone(),
            shipping_weight: draft
                .shipping_weight
                .map(|w| w.as_str().to_owned())
                .unwrap_or_default(),
            photos: draft.photos.clone(),
            seller_id: None,
        }
    }
}

/// Optional filters for the product listing endpoint, ANDed together.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub size: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
}

impl ProductQuery {
    fn as_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(size) = &self.size {
            pairs.push(("size", size.clone()));
        }
        if let Some(min) = &self.min_price {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = &self.max_price {
            pairs.push(("maxPrice", max.to_string()));
        }
        pairs
    }
}

/// Visual transformation parameters for the local enhancement fallback.
///
/// When the enhancement service runs in demo mode the caller applies these
/// itself by compositing the image locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transformations {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub shadow: bool,
    #[serde(default)]
    pub background: Option<String>,
}

impl Transformations {
    /// The filter string for local compositing.
    #[must_use]
    pub fn css_filter(&self) -> String {
        format!(
            "brightness({}) contrast({}) saturate({})",
            self.brightness, self.contrast, self.saturation
        )
    }
}

/// Result of an enhancement request.
#[derive(Debug, Clone, PartialEq)]
pub enum EnhanceOutcome {
    /// The hosted model produced an enhanced rendition at this URL.
    Enhanced(String),
    /// Demo mode: apply these transformations locally.
    Demo(Transformations),
}

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    products: Vec<RemoteProduct>,
}

#[derive(Debug, Deserialize)]
struct CreateEnvelope {
    product: RemoteProduct,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnhanceEnvelope {
    enhanced_image: Option<String>,
    #[serde(default)]
    demo_mode: bool,
    transformations: Option<Transformations>,
}

/// Client for the Vintly product service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against a service base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Publish a wizard draft.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or the server rejects the
    /// draft; the caller feeds the message back into the wizard as an
    /// inline error.
    pub async fn publish(&self, draft: &ListingDraft) -> Result<RemoteProduct, ApiError> {
        self.create_product(&CreateProductRequest::from_draft(draft))
            .await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the server's message on a non-2xx
    /// response.
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create_product(
        &self,
        request: &CreateProductRequest,
    ) -> Result<RemoteProduct, ApiError> {
        let response = self
            .client
            .post(format!("{}/api/products", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let envelope: CreateEnvelope = Self::parse(response, "Failed to create listing").await?;
        Ok(envelope.product)
    }

    /// Fetch available products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request or server failure.
    #[instrument(skip(self, query))]
    pub async fn products(&self, query: &ProductQuery) -> Result<Vec<RemoteProduct>, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/products", self.base_url))
            .query(&query.as_pairs())
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let envelope: ProductsEnvelope = Self::parse(response, "Failed to fetch products").await?;
        Ok(envelope.products)
    }

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 404 when the id does not
    /// resolve.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<RemoteProduct, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/products/{id}", self.base_url))
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Self::parse(response, "Failed to fetch product").await
    }

    /// Delete a product the seller owns.
    ///
    /// Deleting an id that does not resolve (or is owned by someone else)
    /// reports success with nothing removed.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on request or server failure.
    #[instrument(skip(self))]
    pub async fn delete_product(
        &self,
        id: ProductId,
        seller_id: ProfileId,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(format!("{}/api/products/{id}", self.base_url))
            .query(&[("sellerId", seller_id.to_string())])
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let _: serde_json::Value = Self::parse(response, "Failed to delete product").await?;
        Ok(())
    }

    /// Run a photo through the enhancement endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Response` if the server reports success without
    /// either an enhanced image or demo transformations.
    #[instrument(skip(self, image))]
    pub async fn enhance_photo(&self, image: &str) -> Result<EnhanceOutcome, ApiError> {
        let response = self
            .client
            .post(format!("{}/api/enhance-photo", self.base_url))
            .json(&serde_json::json!({ "image": image }))
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let envelope: EnhanceEnvelope = Self::parse(response, "Failed to enhance photo").await?;

        if let Some(url) = envelope.enhanced_image {
            return Ok(EnhanceOutcome::Enhanced(url));
        }
        if envelope.demo_mode
            && let Some(transformations) = envelope.transformations
        {
            return Ok(EnhanceOutcome::Demo(transformations));
        }
        Err(ApiError::Response(
            "enhancement response carried neither an image nor transformations".to_owned(),
        ))
    }

    /// Decode a response body, translating error statuses into
    /// `ApiError::Api` with the server-provided message when present.
    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiError::Response(e.to_string()))
        } else {
            let message = response
                .json::<ErrorEnvelope>()
                .await
                .map_or_else(|_| fallback.to_owned(), |e| e.error);
            Err(ApiError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use vintly_core::{Condition, ListingCategory, ShippingWeight, Size};

    #[test]
    fn test_request_from_draft_uses_form_vocabulary() {
        let draft = ListingDraft {
            title: "Silk Scarf".to_owned(),
            category: Some(ListingCategory::Watches),
            size: Some(Size::OneSize),
            condition: Some(Condition::Good),
            brand: "Hermès".to_owned(),
            price: "120".to_owned(),
            shipping_weight: Some(ShippingWeight::Small),
            photos: vec!["data:image/jpeg;base64,AAAA".to_owned()],
            ..ListingDraft::default()
        };

        let request = CreateProductRequest::from_draft(&draft);

        assert_eq!(request.category, "watches");
        assert_eq!(request.size, "One Size");
        assert_eq!(request.condition, "good");
        assert_eq!(request.price, "120");
        assert_eq!(request.seller_id, None);
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let draft = ListingDraft {
            shipping_weight: Some(ShippingWeight::Medium),
            ..ListingDraft::default()
        };
        let json = serde_json::to_value(CreateProductRequest::from_draft(&draft)).unwrap();

        assert_eq!(json["shippingWeight"], "medium");
        assert!(json.get("sellerId").is_none());
        assert!(json.get("photos").is_some());
    }

    #[test]
    fn test_query_pairs() {
        let query = ProductQuery {
            min_price: Some(Price::parse("1000").unwrap()),
            max_price: Some(Price::parse("3000").unwrap()),
            ..ProductQuery::default()
        };

        assert_eq!(
            query.as_pairs(),
            vec![
                ("minPrice", "1000".to_owned()),
                ("maxPrice", "3000".to_owned())
            ]
        );
    }

    #[test]
    fn test_css_filter_string() {
        let transformations = Transformations {
            brightness: 1.1,
            contrast: 1.05,
            saturation: 1.05,
            shadow: true,
            background: Some("gradient".to_owned()),
        };

        assert_eq!(
            transformations.css_filter(),
            "brightness(1.1) contrast(1.05) saturate(1.05)"
        );
    }

    #[test]
    fn test_enhance_envelope_demo_shape() {
        let envelope: EnhanceEnvelope = serde_json::from_str(
            r#"{
                "success": true,
                "enhancedImage": null,
                "demoMode": true,
                "transformations": {
                    "brightness": 1.1,
                    "contrast": 1.05,
                    "saturation": 1.05,
                    "shadow": true,
                    "background": "gradient"
                },
                "message": "Demo mode"
            }"#,
        )
        .unwrap();

        assert!(envelope.demo_mode);
        assert!(envelope.enhanced_image.is_none());
        assert_eq!(envelope.transformations.unwrap().brightness, 1.1);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}
