//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! lsr-cli migrate
//! ```
//!
//! Runs the settings migrations from `crates/server/migrations/` and creates
//! the session table used by the shopper rate cache.

use tower_sessions_sqlx_store::PostgresStore;

use super::{CliError, connect};

/// Run all migrations.
///
/// # Errors
///
/// Returns `CliError` if the connection or any migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running settings migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Running session store migrations...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
