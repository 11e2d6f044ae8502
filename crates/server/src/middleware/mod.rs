//! HTTP middleware and request extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (per-shopper rate cache)
//!
//! Admin authentication and checkout correlation are extractors used by the
//! handlers that need them.

pub mod auth;
pub mod checkout_trace;
pub mod session;

pub use auth::RequireAdminToken;
pub use checkout_trace::{CHECKOUT_ID_HEADER, CheckoutTrace};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
