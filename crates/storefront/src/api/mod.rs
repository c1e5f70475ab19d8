//! Remote catalog and shop API clients.
//!
//! # Architecture
//!
//! - The remote API is the source of truth - NO local sync, direct calls
//! - Nothing is cached and nothing is retried; every view load re-fetches
//! - No request timeout is configured
//!
//! # Sources
//!
//! ## Catalog source
//! - A single opaque identifier, read once per catalog view load
//! - Resolved by [`RemoteCatalog`]; only `http`/`https` identifiers can be
//!   fetched, anything else fails like a rejected request
//! - Body: `{"products": [...]}`
//!
//! ## Shop API
//! - `GET {base}/products` - flat array of products
//! - `POST {base}/cart` with `{"productId": ...}` - add to cart
//! - `DELETE {base}/cart/{id}` - remove from cart
//!
//! The views talk to these through the [`CatalogSource`] and [`ShopApi`]
//! traits so they can run against in-memory fakes in tests.

mod catalog;
mod shop;

pub use catalog::RemoteCatalog;
pub use shop::ShopApiClient;

use std::future::Future;

use reqwest::StatusCode;
use shopview_core::{Product, ProductId};
use thiserror::Error;

/// Errors that can occur when talking to a remote source.
///
/// The views never show these to the user; they only pick the fixed message
/// for the failed operation. The cause is kept for logs and error tracking.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, TLS, ...).
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    /// The source identifier names something that cannot be requested.
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    /// The server answered with a non-success status.
    #[error("Unexpected status: {0}")]
    HttpStatus(StatusCode),

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    HttpStatus(u16),
    Parse,
}

impl ApiError {
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Network(_) | Self::UnsupportedSource(_) => FailureKind::Network,
            Self::HttpStatus(status) => FailureKind::HttpStatus(status.as_u16()),
            Self::Parse(_) => FailureKind::Parse,
        }
    }
}

/// A read-only source for the catalog view.
pub trait CatalogSource: Send + Sync + 'static {
    /// Fetch the whole product collection.
    fn fetch_catalog(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;
}

/// The shop API behind the cart view.
pub trait ShopApi: Send + Sync + 'static {
    /// Fetch the product collection.
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// Create a remote cart entry for a product.
    fn add_to_cart(&self, id: &ProductId) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Delete the remote cart entry for a product.
    fn remove_from_cart(&self, id: &ProductId)
    -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Turn a non-success status into [`ApiError::HttpStatus`], logging a prefix
/// of the body for diagnostics.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(
        status = %status,
        body = %body.chars().take(200).collect::<String>(),
        "Remote API returned non-success status"
    );
    Err(ApiError::HttpStatus(status))
}
