//! Settings management commands.
//!
//! # Usage
//!
//! ```bash
//! lsr-cli settings show
//! lsr-cli settings set --url https://rates.example.com/quote --secret <secret>
//! lsr-cli uninstall
//! ```

use live_rates_server::settings::{PgSettingsStore, SettingsStore};
use secrecy::ExposeSecret;

use super::{CliError, connect};

/// Print the stored settings with the secret masked.
///
/// # Errors
///
/// Returns `CliError` if the settings cannot be read.
pub async fn show() -> Result<(), CliError> {
    let store = PgSettingsStore::new(connect().await?);
    let settings = store.load_uncached().await?;

    let url = settings.url().unwrap_or("(not set)");
    let secret = settings
        .secret()
        .map_or_else(|| "(not set)".to_string(), |s| mask(s.expose_secret()));

    #[allow(clippy::print_stdout)]
    {
        println!("shipping_rates_url:    {url}");
        println!("shipping_rates_secret: {secret}");
    }

    Ok(())
}

/// Store both settings.
///
/// # Errors
///
/// Returns `CliError` if the URL is invalid or the write fails.
pub async fn set(url: &str, secret: &str) -> Result<(), CliError> {
    let store = SettingsStore::Postgres(PgSettingsStore::new(connect().await?));
    let saved = store.save(url, secret).await?;

    tracing::info!(
        "Settings set successfully. URL: {}",
        saved.url().unwrap_or_default()
    );
    Ok(())
}

/// Delete both settings.
///
/// # Errors
///
/// Returns `CliError` if the delete fails.
pub async fn uninstall() -> Result<(), CliError> {
    let store = SettingsStore::Postgres(PgSettingsStore::new(connect().await?));
    let removed = store.clear().await?;

    tracing::info!("Removed {} live rates setting(s)", removed);
    Ok(())
}

/// Show the first four characters of a secret.
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}****")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("abcdefgh"), "abcd****");
        assert_eq!(mask("ab"), "ab****");
        assert_eq!(mask(""), "****");
    }
}
