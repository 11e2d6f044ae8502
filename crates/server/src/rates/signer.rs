//! Request signing.
//!
//! The rate service verifies `X-PS-LSR-SIGNATURE` against the raw request
//! body, so the signature must be computed over the exact bytes that are
//! sent. Never re-serialize between signing and sending.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use super::ShippingError;

type HmacSha256 = Hmac<Sha256>;

/// Scheme tag prefixed to every signature.
pub const SIGNATURE_SCHEME: &str = "sha256=";

/// Compute the signature header value for a request body.
///
/// Returns `sha256=<base64(hmac_sha256(secret, body))>`.
///
/// # Errors
///
/// Returns `ShippingError::Signing` if the MAC cannot be keyed.
pub fn sign(body: &[u8], secret: &SecretString) -> Result<String, ShippingError> {
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|e| ShippingError::Signing(e.to_string()))?;
    mac.update(body);

    let digest = STANDARD.encode(mac.finalize().into_bytes());
    Ok(format!("{SIGNATURE_SCHEME}{digest}"))
}
