//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. `TraceLayer` (request span with an empty `request_id` field)
//! 3. Request ID (fills in `request_id`, tags Sentry scope)
//! 4. Security headers

pub mod request_id;
pub mod security_headers;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
