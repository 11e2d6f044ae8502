//! Checkout correlation for rate calculations.
//!
//! A checkout host may send `x-request-id` with each rate request; when it
//! is missing or unusable a UUID v4 is minted instead. The id is attached to
//! the calculation span and the Sentry scope next to the shipping method, and
//! returned on the response so host logs and ours can be joined. Failures are
//! never reported to the host, so this id is the only handle it gets.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, request::Parts},
};
use tower_sessions::session::Id;
use tracing::{Span, field};
use uuid::Uuid;

use crate::state::AppState;

/// Header carrying the checkout correlation id, in both directions.
pub const CHECKOUT_ID_HEADER: &str = "x-request-id";

/// Longest host-supplied id that is accepted.
const MAX_CHECKOUT_ID_LEN: usize = 128;

/// Correlation id for one rate calculation.
#[derive(Debug, Clone)]
pub struct CheckoutTrace {
    id: String,
    method_id: String,
}

impl FromRequestParts<AppState> for CheckoutTrace {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            id: checkout_id(&parts.headers),
            method_id: state.config().method.id.clone(),
        })
    }
}

impl CheckoutTrace {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Record the id and shopper session on the current span and tag the
    /// Sentry scope with the id and shipping method.
    ///
    /// The span must declare `checkout_id` and `session_id` fields.
    pub fn record(&self, session_id: Option<Id>) {
        let span = Span::current();
        span.record("checkout_id", self.id.as_str());
        if let Some(session_id) = session_id {
            span.record("session_id", field::display(session_id));
        }

        sentry::configure_scope(|scope| {
            scope.set_tag("checkout_id", &self.id);
            scope.set_tag("shipping_method", &self.method_id);
        });
    }

    /// Response headers echoing the id back to the host.
    #[must_use]
    pub fn response_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.id) {
            headers.insert(CHECKOUT_ID_HEADER, value);
        }
        headers
    }
}

/// Host-supplied id if it is short visible ASCII, otherwise a fresh UUID v4.
fn checkout_id(headers: &HeaderMap) -> String {
    headers
        .get(CHECKOUT_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_CHECKOUT_ID_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}
