//! Integration tests for the `PostgreSQL` settings store.
//!
//! These tests require a running `PostgreSQL` database reachable through
//! `DATABASE_URL`. The settings migration is applied before each test.
//!
//! Run with: `cargo test -p live-rates-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use live_rates_server::rates::SettingsProvider;
use live_rates_server::settings::{PgSettingsStore, SECRET_KEY, URL_KEY};
use secrecy::ExposeSecret;
use sqlx::PgPool;

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPool::connect(&url).await.unwrap();
    sqlx::migrate!("../server/migrations").run(&pool).await.unwrap();
    sqlx::query("DELETE FROM live_rates.settings WHERE key = ANY($1)")
        .bind(vec![URL_KEY.to_string(), SECRET_KEY.to_string()])
        .execute(&pool)
        .await
        .unwrap();
    pool
}

// =============================================================================
// Save
// =============================================================================

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_save_writes_both_values() {
    let store = PgSettingsStore::new(pool().await);

    store.save("https://rates.test/quote", "k3y").await.unwrap();

    let settings = store.rate_settings().await.unwrap();
    assert_eq!(settings.url(), Some("https://rates.test/quote"));
    assert_eq!(settings.secret().unwrap().expose_secret(), "k3y");
}

#[tokio::test]
#[ignore = "Requires PostgreSQL database"]
async fn test_failed_save_leaves_previous_pair() {
    let store = PgSettingsStore::new(pool().await);
    store.save("https://old.test/quote", "old").await.unwrap();

    // Warm the read cache with the old pair
    store.rate_settings().await.unwrap();

    // PostgreSQL rejects NUL in text, so the second upsert fails
    assert!(store.save("https://new.test/quote", "bad\0secret").await.is_err());

    let settings = store.rate_settings().await.unwrap();
    assert_eq!(settings.url(), Some("https://old.test/quote"));
    assert_eq!(settings.secret().unwrap().expose_secret(), "old");

    let stored = store.load_uncached().await.unwrap();
    assert_eq!(stored.url(), Some("https://old.test/quote"));
}
