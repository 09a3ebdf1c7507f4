//! Photo enhancement handler.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::enhance::{DEMO_HINT, Enhancement};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Body of the enhancement endpoint.
#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    #[serde(default)]
    pub image: Option<String>,
}

/// POST `/api/enhance-photo` - enhance a single photo.
///
/// With a hosted model configured the response carries the enhanced image
/// URL; otherwise (or when the model fails) it carries demo-mode
/// transformation parameters the client applies itself.
pub async fn enhance_photo(
    State(state): State<AppState>,
    Json(body): Json<EnhanceRequest>,
) -> Result<Json<Value>> {
    let image = body
        .image
        .filter(|image| !image.is_empty())
        .ok_or_else(|| AppError::BadRequest("No image provided".to_owned()))?;

    let response = match state.enhancer().enhance(&image).await {
        Enhancement::Enhanced(url) => json!({
            "success": true,
            "enhancedImage": url,
            "message": "Photo enhanced successfully",
        }),
        Enhancement::Demo(transformations) => json!({
            "success": true,
            "enhancedImage": null,
            "demoMode": true,
            "transformations": transformations,
            "message": DEMO_HINT,
        }),
    };

    Ok(Json(response))
}
