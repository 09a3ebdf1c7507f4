//! Demo data seeding command.
//!
//! Ensures the demo seller profile exists and inserts the fixture catalog
//! through the server crate's seeding module. Idempotent: a catalog that
//! already has products is left untouched.
//!
//! # Usage
//!
//! ```bash
//! vintly seed
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string for the product
//!   service database

use secrecy::SecretString;
use thiserror::Error;
use tracing::info;

use vintly_server::catalog::{Catalog, CatalogError, PgCatalog};
use vintly_server::seed;

/// Errors from the seed command.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Seed the demo seller profile and fixture catalog.
///
/// # Errors
///
/// Returns `SeedError` if `DATABASE_URL` is unset or a catalog operation
/// fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("DATABASE_URL"))?;

    info!("Connecting to product service database...");
    let catalog = Catalog::Pg(PgCatalog::connect(&database_url).await?);

    let summary = seed::seed(&catalog).await?;
    if summary.skipped {
        info!("Catalog already seeded, nothing to do");
    } else {
        info!("Seeded {} fixture products", summary.inserted);
    }
    Ok(())
}
