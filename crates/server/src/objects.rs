//! Photo object storage.
//!
//! Listing photos arrive as inline data-URIs and leave as public URLs. Two
//! backends: [`BucketStore`] uploads to a hosted storage bucket over REST
//! (authenticated with a service key), [`LocalObjects`] writes into a
//! directory the server itself serves under `/uploads`. Both derive a
//! public URL the catalog stores verbatim in image rows.

use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::instrument;

use crate::config::StorageConfig;

/// Errors that can occur during object storage operations.
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    /// The inline image payload could not be decoded.
    #[error("invalid image data: {0}")]
    InvalidImage(String),

    /// The upload request never completed.
    #[error("upload request failed: {0}")]
    Request(String),

    /// The storage service answered with an error status.
    #[error("storage service error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, best effort.
        message: String,
    },

    /// Local filesystem write failed.
    #[error("upload write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// An inline-encoded image decoded from a `data:image/...;base64,` URI.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image subtype from the data-URI, e.g. `jpeg` or `png`.
    pub format: String,
    /// Raw image bytes.
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    /// Decode a `data:image/<fmt>;base64,<payload>` URI.
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::InvalidImage` when the URI is not an
    /// inline base64 image or the payload fails to decode.
    pub fn from_data_uri(uri: &str) -> Result<Self, ObjectStoreError> {
        let rest = uri
            .strip_prefix("data:image/")
            .ok_or_else(|| ObjectStoreError::InvalidImage("not an image data-URI".to_owned()))?;
        let (format, payload) = rest.split_once(";base64,").ok_or_else(|| {
            ObjectStoreError::InvalidImage("missing base64 payload".to_owned())
        })?;
        if format.is_empty() || !format.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ObjectStoreError::InvalidImage(format!(
                "unexpected image format: {format}"
            )));
        }
        let bytes = BASE64
            .decode(payload)
            .map_err(|e| ObjectStoreError::InvalidImage(e.to_string()))?;
        Ok(Self {
            format: format.to_owned(),
            bytes,
        })
    }

    /// MIME content type for upload requests.
    #[must_use]
    pub fn content_type(&self) -> String {
        format!("image/{}", self.format)
    }
}

/// The object storage backend selected at startup.
#[derive(Debug)]
pub enum ObjectStore {
    /// Hosted bucket over REST.
    Bucket(BucketStore),
    /// Local uploads directory served by this binary.
    Local(LocalObjects),
}

impl ObjectStore {
    /// Store an image under `key` and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError` if the upload fails; callers treat each
    /// photo as best effort and skip failures.
    pub async fn upload(&self, key: &str, image: &DecodedImage) -> Result<String, ObjectStoreError> {
        match self {
            Self::Bucket(bucket) => bucket.upload(key, image).await,
            Self::Local(local) => local.upload(key, image).await,
        }
    }
}

/// Hosted storage bucket accessed over its REST API.
pub struct BucketStore {
    client: Client,
    endpoint: String,
    bucket: String,
    service_key: SecretString,
}

impl std::fmt::Debug for BucketStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketStore")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("service_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl BucketStore {
    /// Create a bucket store from storage configuration.
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            bucket: config.bucket.clone(),
            service_key: config.service_key.clone(),
        }
    }

    /// Upload an object and return its public URL.
    ///
    /// Uploads are upserts: re-uploading a key overwrites the previous
    /// object, matching the whole-value write semantics elsewhere in the
    /// system.
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError` on request failure or a non-2xx response.
    #[instrument(skip(self, image), fields(key = %key, bytes = image.bytes.len()))]
    pub async fn upload(&self, key: &str, image: &DecodedImage) -> Result<String, ObjectStoreError> {
        let response = self
            .client
            .post(format!(
                "{}/storage/v1/object/{}/{key}",
                self.endpoint, self.bucket
            ))
            .bearer_auth(self.service_key.expose_secret())
            .header("content-type", image.content_type())
            .header("x-upsert", "true")
            .body(image.bytes.clone())
            .send()
            .await
            .map_err(|e| ObjectStoreError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ObjectStoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(format!(
            "{}/storage/v1/object/public/{}/{key}",
            self.endpoint, self.bucket
        ))
    }
}

/// Local-directory object storage, served by the binary under `/uploads`.
#[derive(Debug)]
pub struct LocalObjects {
    root: PathBuf,
    base_url: String,
}

impl LocalObjects {
    /// Create a local store rooted at `root`, publishing URLs under
    /// `base_url`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            root: root.into(),
            base_url,
        }
    }

    /// Write an object into the uploads directory and return its public
    /// URL.
    ///
    /// # Errors
    ///
    /// Returns `ObjectStoreError::Io` if the directory or file write fails.
    #[instrument(skip(self, image), fields(key = %key))]
    pub async fn upload(&self, key: &str, image: &DecodedImage) -> Result<String, ObjectStoreError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &image.bytes).await?;
        Ok(format!("{}/uploads/{key}", self.base_url))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // A 1x1 transparent PNG.
    const TINY_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_decode_data_uri() {
        let image = DecodedImage::from_data_uri(TINY_PNG).unwrap();
        assert_eq!(image.format, "png");
        assert_eq!(image.content_type(), "image/png");
        assert!(!image.bytes.is_empty());
    }

    #[test]
    fn test_decode_rejects_plain_urls() {
        let result = DecodedImage::from_data_uri("https://example.com/photo.jpg");
        assert!(matches!(result, Err(ObjectStoreError::InvalidImage(_))));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let result = DecodedImage::from_data_uri("data:image/jpeg;base64,!!!not-base64!!!");
        assert!(matches!(result, Err(ObjectStoreError::InvalidImage(_))));
    }

    #[tokio::test]
    async fn test_local_upload_writes_file_and_derives_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjects::new(dir.path(), "http://localhost:3000/");
        let image = DecodedImage::from_data_uri(TINY_PNG).unwrap();

        let url = store.upload("abc/0_1700000000000.png", &image).await.unwrap();

        assert_eq!(url, "http://localhost:3000/uploads/abc/0_1700000000000.png");
        assert!(dir.path().join("abc/0_1700000000000.png").exists());
    }
}
