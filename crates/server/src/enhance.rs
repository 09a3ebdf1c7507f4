//! Photo enhancement.
//!
//! With a Replicate token configured, photos go through a hosted
//! background-removal model: create a prediction, poll until it reaches a
//! terminal status, return the output URL. Any failure along the way falls
//! through to demo mode, which answers with fixed visual transformation
//! parameters the client applies itself by compositing the image locally.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{instrument, warn};

/// Replicate REST API base URL.
const REPLICATE_API_BASE: &str = "https://api.replicate.com/v1";

/// Version hash of the background-removal model (rembg).
const BACKGROUND_REMOVAL_VERSION: &str =
    "fb8af171cfa1616ddcf1242c093f9c46bcada5ad4cf6f2fbe8b81b330ec5c003";

/// Delay between prediction status polls.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Setup hint returned alongside demo-mode responses.
pub const DEMO_HINT: &str = "Demo mode: Connect Replicate API for full AI enhancement. \
     Add REPLICATE_API_TOKEN to your .env file.";

/// Errors from the hosted enhancement model.
#[derive(Debug, Error)]
pub enum EnhanceError {
    /// The request never completed.
    #[error("enhancement request failed: {0}")]
    Request(String),

    /// The model API answered with an error status.
    #[error("enhancement service error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, best effort.
        message: String,
    },

    /// The response body was not the expected shape.
    #[error("unexpected enhancement response: {0}")]
    Response(String),

    /// The prediction reached a terminal status other than succeeded.
    #[error("enhancement model failed: {0}")]
    ModelFailed(String),
}

/// Visual transformation parameters for the client-side fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transformations {
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub shadow: bool,
    pub background: String,
}

/// The fixed demo-mode transformation set: a subtle lift in brightness,
/// contrast and saturation, a drop shadow, and a gradient backdrop.
#[must_use]
pub fn demo_transformations() -> Transformations {
    Transformations {
        brightness: 1.1,
        contrast: 1.05,
        saturation: 1.05,
        shadow: true,
        background: "gradient".to_owned(),
    }
}

/// Outcome of an enhancement request.
#[derive(Debug, Clone, PartialEq)]
pub enum Enhancement {
    /// The hosted model produced an enhanced rendition at this URL.
    Enhanced(String),
    /// Demo mode: the client applies these transformations itself.
    Demo(Transformations),
}

/// The enhancement backend selected at startup.
#[derive(Debug)]
pub enum Enhancer {
    /// Hosted model round trip.
    Replicate(ReplicateClient),
    /// Fixed transformation parameters only.
    Demo,
}

impl Enhancer {
    /// Enhance a photo, falling through to demo mode on any model failure.
    pub async fn enhance(&self, image: &str) -> Enhancement {
        match self {
            Self::Replicate(client) => match client.remove_background(image).await {
                Ok(url) => Enhancement::Enhanced(url),
                Err(err) => {
                    warn!(%err, "enhancement model failed, answering in demo mode");
                    Enhancement::Demo(demo_transformations())
                }
            },
            Self::Demo => Enhancement::Demo(demo_transformations()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    output: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl Prediction {
    fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed" | "canceled")
    }
}

/// Client for the Replicate predictions API.
pub struct ReplicateClient {
    client: Client,
    token: SecretString,
}

impl std::fmt::Debug for ReplicateClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicateClient")
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl ReplicateClient {
    /// Create a client with an API token.
    #[must_use]
    pub fn new(token: SecretString) -> Self {
        Self {
            client: Client::new(),
            token,
        }
    }

    /// Run the background-removal model over an inline image and return
    /// the output URL.
    ///
    /// Polls at a fixed interval until the prediction reaches a terminal
    /// status; there is no configured timeout, matching the transport's
    /// default behavior.
    ///
    /// # Errors
    ///
    /// Returns `EnhanceError` if any request fails or the prediction ends
    /// in a status other than succeeded.
    #[instrument(skip(self, image))]
    pub async fn remove_background(&self, image: &str) -> Result<String, EnhanceError> {
        let mut prediction = self
            .create_prediction(image)
            .await?;

        while !prediction.is_terminal() {
            tokio::time::sleep(POLL_INTERVAL).await;
            prediction = self.get_prediction(&prediction.id).await?;
        }

        if prediction.status != "succeeded" {
            let detail = prediction
                .error
                .map_or_else(|| prediction.status.clone(), |e| e.to_string());
            return Err(EnhanceError::ModelFailed(detail));
        }

        extract_output_url(prediction.output)
    }

    async fn create_prediction(&self, image: &str) -> Result<Prediction, EnhanceError> {
        let response = self
            .client
            .post(format!("{REPLICATE_API_BASE}/predictions"))
            .header(
                "Authorization",
                format!("Token {}", self.token.expose_secret()),
            )
            .json(&serde_json::json!({
                "version": BACKGROUND_REMOVAL_VERSION,
                "input": { "image": image },
            }))
            .send()
            .await
            .map_err(|e| EnhanceError::Request(e.to_string()))?;

        Self::parse(response).await
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction, EnhanceError> {
        let response = self
            .client
            .get(format!("{REPLICATE_API_BASE}/predictions/{id}"))
            .header(
                "Authorization",
                format!("Token {}", self.token.expose_secret()),
            )
            .send()
            .await
            .map_err(|e| EnhanceError::Request(e.to_string()))?;

        Self::parse(response).await
    }

    async fn parse(response: reqwest::Response) -> Result<Prediction, EnhanceError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EnhanceError::Api {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json()
            .await
            .map_err(|e| EnhanceError::Response(e.to_string()))
    }
}

/// The model outputs either a single URI or a list of URIs; take the
/// first.
fn extract_output_url(output: Option<serde_json::Value>) -> Result<String, EnhanceError> {
    match output {
        Some(serde_json::Value::String(url)) => Ok(url),
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .find_map(|item| match item {
                serde_json::Value::String(url) => Some(url),
                _ => None,
            })
            .ok_or_else(|| EnhanceError::Response("output list held no URL".to_owned())),
        other => Err(EnhanceError::Response(format!(
            "unexpected model output: {other:?}"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_enhancer_returns_fixed_transformations() {
        let enhancer = Enhancer::Demo;

        let Enhancement::Demo(transformations) = enhancer.enhance("data:image/png;base64,AA==").await
        else {
            panic!("expected demo outcome");
        };

        assert_eq!(transformations, demo_transformations());
        assert!(transformations.shadow);
        assert_eq!(transformations.background, "gradient");
    }

    #[test]
    fn test_extract_output_string() {
        let output = Some(serde_json::json!("https://replicate.delivery/out.png"));
        assert_eq!(
            extract_output_url(output).unwrap(),
            "https://replicate.delivery/out.png"
        );
    }

    #[test]
    fn test_extract_output_list() {
        let output = Some(serde_json::json!(["https://replicate.delivery/out.png"]));
        assert_eq!(
            extract_output_url(output).unwrap(),
            "https://replicate.delivery/out.png"
        );
    }

    #[test]
    fn test_extract_output_missing() {
        assert!(extract_output_url(None).is_err());
    }

    #[test]
    fn test_prediction_terminal_statuses() {
        for (status, terminal) in [
            ("starting", false),
            ("processing", false),
            ("succeeded", true),
            ("failed", true),
            ("canceled", true),
        ] {
            let prediction = Prediction {
                id: "p1".to_owned(),
                status: status.to_owned(),
                output: None,
                error: None,
            };
            assert_eq!(prediction.is_terminal(), terminal, "status {status}");
        }
    }
}
