//! Rate service HTTP client.
//!
//! The client posts the already-signed body and parses the `packages_rates`
//! document. Outbound HTTP goes through [`HttpPoster`] so the orchestrator can
//! be tested without a network; [`ReqwestPoster`] is the production poster.

use std::future::Future;
use std::time::Duration;

use live_rates_core::{Rate, RatesResponse};
use tracing::{debug, instrument};

use super::ShippingError;

/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "X-PS-LSR-SIGNATURE";

/// Upper bound on a rate service call.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Status and body of a completed POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends a POST and returns whatever the server answered.
///
/// Implementations return `ShippingError::Transport` only when no HTTP
/// response was received; status handling belongs to [`RateClient`].
pub trait HttpPoster: Send + Sync {
    fn post(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> impl Future<Output = Result<PostResponse, ShippingError>> + Send;
}

/// `reqwest`-backed poster.
///
/// TLS certificates are verified, redirects are not followed, compressed
/// responses are accepted and every call is bounded by
/// [`REQUEST_TIMEOUT_SECS`].
#[derive(Debug, Clone)]
pub struct ReqwestPoster {
    client: reqwest::Client,
}

impl ReqwestPoster {
    /// Create a poster with the rate service transport policy.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Create a poster whose calls give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .gzip(true)
            .build()?;

        Ok(Self { client })
    }
}

impl HttpPoster for ReqwestPoster {
    async fn post(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> Result<PostResponse, ShippingError> {
        let mut request = self.client.post(url).body(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(PostResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn transport_error(e: reqwest::Error) -> ShippingError {
    if e.is_timeout() {
        ShippingError::Transport(format!("request timed out: {e}"))
    } else {
        ShippingError::Transport(e.to_string())
    }
}

/// Client for the remote rate service.
#[derive(Debug, Clone)]
pub struct RateClient<H> {
    poster: H,
}

impl<H: HttpPoster> RateClient<H> {
    #[must_use]
    pub const fn new(poster: H) -> Self {
        Self { poster }
    }

    /// Underlying poster.
    #[must_use]
    pub const fn poster(&self) -> &H {
        &self.poster
    }

    /// Post a signed rate request and return the quoted rates.
    ///
    /// `body` must be the exact bytes `signature` was computed over.
    ///
    /// # Errors
    ///
    /// Returns `ShippingError::Transport` if no response was received,
    /// `ShippingError::Remote` for any status other than 200, and
    /// `ShippingError::Parse` if the body is not a rates document.
    #[instrument(skip(self, body, signature), fields(url = %url, bytes = body.len()))]
    pub async fn fetch_rates(
        &self,
        url: &str,
        body: Vec<u8>,
        signature: &str,
    ) -> Result<Vec<Rate>, ShippingError> {
        let headers = [
            ("Content-Type", "application/json"),
            (SIGNATURE_HEADER, signature),
        ];

        let response = self.poster.post(url, &headers, body).await?;
        if response.status != 200 {
            return Err(ShippingError::Remote(response.status));
        }

        let rates = parse_rates(&response.body)?;
        debug!(count = rates.len(), "Received shipping rates");
        Ok(rates)
    }
}

/// Parse a rates document, flattening all packages in response order.
///
/// # Errors
///
/// Returns `ShippingError::Parse` if the body is empty or malformed.
pub fn parse_rates(body: &[u8]) -> Result<Vec<Rate>, ShippingError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ShippingError::Parse("empty response body".to_string()));
    }

    serde_json::from_slice::<RatesResponse>(body)
        .map(RatesResponse::into_rates)
        .map_err(|e| ShippingError::Parse(e.to_string()))
}
