//! Admin settings endpoints.
//!
//! Both values are required for live rates to work; a half-configured store
//! reads as not found.

use axum::{Json, extract::State};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdminToken;
use crate::rates::SettingsProvider;
use crate::state::AppState;

/// Response to a successful update.
pub const SAVED_MESSAGE: &str = "Settings set successfully.";

/// Settings as exchanged with the admin client.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPayload {
    pub shipping_rates_url: String,
    pub shipping_rates_secret: String,
}

/// `GET /api/settings`
///
/// # Errors
///
/// Returns `AppError::NotFound` unless both values are set.
pub async fn show(
    _admin: RequireAdminToken,
    State(state): State<AppState>,
) -> Result<Json<SettingsPayload>> {
    let settings = state.settings().rate_settings().await?;

    match (settings.url(), settings.secret()) {
        (Some(url), Some(secret)) => Ok(Json(SettingsPayload {
            shipping_rates_url: url.to_string(),
            shipping_rates_secret: secret.expose_secret().to_string(),
        })),
        _ => Err(AppError::NotFound),
    }
}

/// `POST /api/settings`
///
/// Missing fields are stored as empty strings.
///
/// # Errors
///
/// Returns `AppError::Settings` if the URL is invalid or the write fails.
pub async fn update(
    _admin: RequireAdminToken,
    State(state): State<AppState>,
    Json(payload): Json<SettingsPayload>,
) -> Result<Json<&'static str>> {
    state
        .settings()
        .save(&payload.shipping_rates_url, &payload.shipping_rates_secret)
        .await?;

    Ok(Json(SAVED_MESSAGE))
}
