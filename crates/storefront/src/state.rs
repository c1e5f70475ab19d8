//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;

use crate::api::{RemoteCatalog, ShopApiClient};
use crate::config::StorefrontConfig;
use crate::views::{CartViewer, ViewRegistry};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Error building the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid shop API URL: {0}")]
    InvalidShopUrl(#[from] url::ParseError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Live cart views served by this process.
pub type CartViews = ViewRegistry<CartViewer<ShopApiClient>>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// remote sources and the live cart views.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<RemoteCatalog>,
    shop: Arc<ShopApiClient>,
    carts: CartViews,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the shop API
    /// endpoints cannot be derived from the configured base URL.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        // No timeout: requests wait as long as the remote takes.
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        let catalog = RemoteCatalog::new(client.clone(), &config.api.catalog_source);
        let shop = ShopApiClient::new(client, &config.api.shop_base_url)?;
        let carts = ViewRegistry::new(config.view_idle_timeout);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog: Arc::new(catalog),
                shop: Arc::new(shop),
                carts,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the catalog view's product source.
    #[must_use]
    pub fn catalog(&self) -> Arc<RemoteCatalog> {
        Arc::clone(&self.inner.catalog)
    }

    /// Get the shop API client behind the cart view.
    #[must_use]
    pub fn shop(&self) -> Arc<ShopApiClient> {
        Arc::clone(&self.inner.shop)
    }

    /// Get the registry of live cart views.
    #[must_use]
    pub fn carts(&self) -> &CartViews {
        &self.inner.carts
    }
}
