//! Admin authentication extractor.
//!
//! Settings endpoints are restricted to callers presenting
//! `Authorization: Bearer <LIVE_RATES_ADMIN_TOKEN>`.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use secrecy::ExposeSecret;
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires the admin bearer token.
///
/// Rejects with `AppError::Forbidden` (`403 rest_forbidden`).
///
/// # Example
///
/// ```rust,ignore
/// async fn update_settings(_admin: RequireAdminToken) -> impl IntoResponse {
///     "ok"
/// }
/// ```
pub struct RequireAdminToken;

impl FromRequestParts<AppState> for RequireAdminToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim);

        match presented {
            Some(token)
                if constant_time_compare(token, state.config().admin_token.expose_secret()) =>
            {
                Ok(Self)
            }
            _ => {
                warn!(path = %parts.uri.path(), "Rejected settings request without admin token");
                Err(AppError::Forbidden)
            }
        }
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}
