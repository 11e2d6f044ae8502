//! Checkout integration endpoint.

use axum::{Json, extract::State, http::HeaderMap};
use live_rates_core::{Rate, ShippingPackage};
use tower_sessions::Session;
use tracing::instrument;

use crate::middleware::CheckoutTrace;
use crate::state::AppState;

/// Calculate live rates for a package.
///
/// The shopper's session doubles as the rate cache, so repeated calls with
/// an unchanged cart are answered without contacting the rate service.
/// Always responds 200; an empty list means no live rates are offered.
/// The checkout correlation id is echoed in `x-request-id`.
#[instrument(skip_all, fields(checkout_id, session_id))]
pub async fn calculate(
    State(state): State<AppState>,
    trace: CheckoutTrace,
    session: Session,
    Json(package): Json<ShippingPackage>,
) -> (HeaderMap, Json<Vec<Rate>>) {
    trace.record(session.id());

    let rates = state.service().calculate_shipping(&package, &session).await;
    (trace.response_headers(), Json(rates))
}
