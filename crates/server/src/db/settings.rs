//! Settings repository.
//!
//! Queries are built at runtime so the crate compiles without a live database.

use sqlx::{PgExecutor, PgPool};

use super::RepositoryError;

/// Repository for the `live_rates.settings` key/value table.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a single setting.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM live_rates.settings WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        Ok(value)
    }

    /// Insert or replace several settings in one transaction.
    ///
    /// Either every pair is written or none is.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any write or the commit fails.
    pub async fn upsert_all(&self, pairs: &[(&str, &str)]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for (key, value) in pairs {
            upsert_on(&mut *tx, key, value).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete the given settings. Missing keys are ignored.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, keys: &[&str]) -> Result<u64, RepositoryError> {
        let keys: Vec<String> = keys.iter().map(|k| (*k).to_string()).collect();
        let result = sqlx::query("DELETE FROM live_rates.settings WHERE key = ANY($1)")
            .bind(keys)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

async fn upsert_on<'e, E>(executor: E, key: &str, value: &str) -> Result<(), RepositoryError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r"
        INSERT INTO live_rates.settings (key, value, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (key) DO UPDATE
        SET value = EXCLUDED.value, updated_at = NOW()
        ",
    )
    .bind(key)
    .bind(value)
    .execute(executor)
    .await?;

    Ok(())
}
