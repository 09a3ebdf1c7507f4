//! Unified error handling for API handlers.
//!
//! Provides a unified `AppError` type mapped onto JSON error responses. All
//! route handlers return `Result<T, AppError>`. Internals (database, object
//! storage) are logged server-side and answered with a generic message;
//! validation failures carry their specific message to the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::objects::ObjectStoreError;

/// Application-level error type for the product service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Object storage operation failed.
    #[error("Object storage error: {0}")]
    Objects(#[from] ObjectStoreError),

    /// A required field is absent or empty.
    #[error("Missing required fields")]
    MissingFields,

    /// No seller could be resolved for a product creation.
    #[error("No seller profile found. Please create a user account first.")]
    NoSellerProfile,

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server-side failures with their detail; the client gets a
        // generic message for these.
        if matches!(
            self,
            Self::Catalog(_) | Self::Objects(_) | Self::Internal(_)
        ) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Catalog(_) | Self::Objects(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::MissingFields | Self::NoSellerProfile | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Catalog(_) | Self::Objects(_) | Self::Internal(_) => {
                json!({ "error": "Internal server error" })
            }
            Self::NoSellerProfile => json!({
                "error": self.to_string(),
                "details": "Product rows require a valid seller_id referencing a profile.",
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        assert_eq!(
            AppError::MissingFields.to_string(),
            "Missing required fields"
        );
        assert_eq!(
            AppError::NotFound("Product not found".to_owned()).to_string(),
            "Product not found"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(get_status(AppError::MissingFields), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(AppError::NoSellerProfile),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::BadRequest("bad".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NotFound("missing".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
