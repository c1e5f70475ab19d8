//! Shop API client.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shopview_core::{Price, Product, ProductId};
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, ShopApi, check_status};

/// Body of a cart create request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddToCartBody<'a> {
    product_id: &'a ProductId,
}

/// A product as the shop API lists it. The display name is `title`; any
/// `name` field is ignored along with the other unknown fields.
#[derive(Debug, Deserialize)]
struct ShopProduct {
    id: ProductId,
    #[serde(default)]
    title: Option<String>,
    price: Price,
    #[serde(default)]
    description: Option<String>,
}

impl From<ShopProduct> for Product {
    fn from(product: ShopProduct) -> Self {
        Self {
            id: product.id,
            name: product.title.unwrap_or_default(),
            price: product.price,
            description: product.description.unwrap_or_default(),
        }
    }
}

/// Client for the shop API.
///
/// Cheaply cloneable; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ShopApiClient {
    inner: Arc<ShopApiClientInner>,
}

#[derive(Debug)]
struct ShopApiClientInner {
    client: reqwest::Client,
    products_url: Url,
    cart_url: Url,
}

impl ShopApiClient {
    /// Create a client rooted at `base_url`.
    ///
    /// `base_url` must end with a slash for the relative joins to keep its
    /// last segment; `ApiConfig` guarantees this.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the endpoint URLs cannot be built.
    pub fn new(client: reqwest::Client, base_url: &Url) -> Result<Self, url::ParseError> {
        Ok(Self {
            inner: Arc::new(ShopApiClientInner {
                client,
                products_url: base_url.join("products")?,
                cart_url: base_url.join("cart")?,
            }),
        })
    }

    /// URL of the remote cart entry for `id`.
    fn cart_item_url(&self, id: &ProductId) -> Url {
        let mut url = self.inner.cart_url.clone();
        // Pushing a segment percent-encodes it, so opaque ids with slashes
        // stay a single segment.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&id.to_string());
        }
        url
    }
}

impl ShopApi for ShopApiClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let response = self
            .inner
            .client
            .get(self.inner.products_url.clone())
            .send()
            .await?;
        let response = check_status(response).await?;
        let text = response.text().await?;
        let products: Vec<ShopProduct> = serde_json::from_str(&text)?;

        debug!(count = products.len(), "Fetched shop products");
        Ok(products.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self, id), fields(product_id = %id))]
    async fn add_to_cart(&self, id: &ProductId) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .post(self.inner.cart_url.clone())
            .json(&AddToCartBody { product_id: id })
            .send()
            .await?;
        check_status(response).await?;

        debug!("Created remote cart entry");
        Ok(())
    }

    #[instrument(skip(self, id), fields(product_id = %id))]
    async fn remove_from_cart(&self, id: &ProductId) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .delete(self.cart_item_url(id))
            .send()
            .await?;
        check_status(response).await?;

        debug!("Deleted remote cart entry");
        Ok(())
    }
}
