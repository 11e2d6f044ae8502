//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::rates::{RateClient, ReqwestPoster, RequestBuilder, ShippingRateService};
use crate::settings::{PgSettingsStore, SettingsStore};

/// Rate service as wired for the HTTP server.
pub type RateService = ShippingRateService<SettingsStore, ReqwestPoster>;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: Option<PgPool>,
    service: RateService,
}

impl AppState {
    /// Create state backed by `PostgreSQL` settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ServerConfig, pool: PgPool) -> Result<Self, reqwest::Error> {
        let settings = SettingsStore::Postgres(PgSettingsStore::new(pool.clone()));
        Self::with_settings(config, Some(pool), settings)
    }

    /// Create state with an explicit settings store.
    ///
    /// Without a pool the readiness check always passes.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_settings(
        config: ServerConfig,
        pool: Option<PgPool>,
        settings: SettingsStore,
    ) -> Result<Self, reqwest::Error> {
        let service = ShippingRateService::new(
            config.method.clone(),
            RequestBuilder::new(config.store.clone()),
            settings,
            RateClient::new(ReqwestPoster::new()?),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                service,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Database pool, if the server runs against `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    #[must_use]
    pub fn service(&self) -> &RateService {
        &self.inner.service
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        self.inner.service.settings()
    }
}
