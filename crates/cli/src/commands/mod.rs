//! CLI command implementations.

pub mod migrate;
pub mod settings;
pub mod sign;

use live_rates_server::settings::SettingsError;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Settings could not be read or written.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Input could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Signature could not be computed.
    #[error("Signing error: {0}")]
    Signing(String),
}

/// Connect using `LIVE_RATES_DATABASE_URL`, falling back to `DATABASE_URL`.
async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("LIVE_RATES_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingEnvVar("LIVE_RATES_DATABASE_URL"))?;

    tracing::info!("Connecting to live rates database...");
    Ok(PgPool::connect(database_url.expose_secret()).await?)
}
