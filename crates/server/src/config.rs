//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional integrations (demo-mode fallbacks when absent)
//! - `DATABASE_URL` - `PostgreSQL` connection string; without it the
//!   in-memory catalog is used
//! - `STORAGE_URL` - hosted storage endpoint (e.g. `https://xyz.supabase.co`)
//! - `STORAGE_SERVICE_KEY` - storage service key (required with `STORAGE_URL`)
//! - `STORAGE_BUCKET` - bucket name (default: products)
//! - `REPLICATE_API_TOKEN` - enhancement model token; without it the
//!   enhancement endpoint answers in demo mode
//!
//! ## Server
//! - `VINTLY_HOST` - bind address (default: 127.0.0.1)
//! - `VINTLY_PORT` - listen port (default: 3000)
//! - `VINTLY_BASE_URL` - public URL, used to build local upload links
//!   (default: `http://<host>:<port>`)
//! - `VINTLY_UPLOADS_DIR` - local uploads directory (default: uploads)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used for locally-served upload links
    pub base_url: String,
    /// `PostgreSQL` connection URL; `None` selects the in-memory catalog
    pub database_url: Option<SecretString>,
    /// Hosted storage bucket; `None` selects the local uploads directory
    pub storage: Option<StorageConfig>,
    /// Enhancement model token; `None` selects demo-mode responses
    pub replicate_token: Option<SecretString>,
    /// Directory for locally-stored uploads
    pub uploads_dir: PathBuf,
}

/// Hosted object storage configuration.
///
/// Implements `Debug` manually to redact the service key.
#[derive(Clone)]
pub struct StorageConfig {
    /// Storage endpoint, e.g. `https://xyz.supabase.co`
    pub endpoint: String,
    /// Bucket name
    pub bucket: String,
    /// Service key used for authenticated uploads
    pub service_key: SecretString,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse, or if
    /// `STORAGE_URL` is set without `STORAGE_SERVICE_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("VINTLY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("VINTLY_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("VINTLY_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("VINTLY_PORT".to_owned(), e.to_string()))?;
        let base_url =
            get_optional_env("VINTLY_BASE_URL").unwrap_or_else(|| format!("http://{host}:{port}"));

        let database_url = get_optional_env("DATABASE_URL").map(SecretString::from);
        let storage = StorageConfig::from_env()?;
        let replicate_token = get_optional_env("REPLICATE_API_TOKEN").map(SecretString::from);
        let uploads_dir = PathBuf::from(get_env_or_default("VINTLY_UPLOADS_DIR", "uploads"));

        Ok(Self {
            host,
            port,
            base_url,
            database_url,
            storage,
            replicate_token,
            uploads_dir,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StorageConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(endpoint) = get_optional_env("STORAGE_URL") else {
            return Ok(None);
        };

        let service_key = get_optional_env("STORAGE_SERVICE_KEY")
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("STORAGE_SERVICE_KEY".to_owned()))?;

        Ok(Some(Self {
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            bucket: get_env_or_default("STORAGE_BUCKET", "products"),
            service_key,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_owned(),
            database_url: None,
            storage: None,
            replicate_token: None,
            uploads_dir: PathBuf::from("uploads"),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_storage_config_debug_redacts_service_key() {
        let config = StorageConfig {
            endpoint: "https://xyz.supabase.co".to_owned(),
            bucket: "products".to_owned(),
            service_key: SecretString::from("super_secret_service_key"),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("https://xyz.supabase.co"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_service_key"));
    }
}
