//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health               - Liveness
//! GET  /health/ready         - Readiness (database ping)
//!
//! # Checkout
//! POST /api/shipping/rates   - Live rates for a package
//!
//! # Admin (Bearer token)
//! GET  /api/settings         - Read rate service URL and secret
//! POST /api/settings         - Update rate service URL and secret
//! ```

pub mod health;
pub mod rates;
pub mod settings;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/api/shipping/rates", post(rates::calculate))
        .route("/api/settings", get(settings::show).post(settings::update))
}
