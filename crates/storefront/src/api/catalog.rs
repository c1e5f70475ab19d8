//! Catalog source resolution.

use serde::Deserialize;
use shopview_core::{Price, Product, ProductId};
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, CatalogSource, check_status};

/// Response body of a catalog source.
#[derive(Debug, Deserialize)]
struct CatalogBody {
    products: Vec<CatalogProduct>,
}

/// A product as a catalog source sends it. Unknown fields are ignored and a
/// missing or null `name`/`description` renders empty.
#[derive(Debug, Deserialize)]
struct CatalogProduct {
    id: ProductId,
    #[serde(default)]
    name: Option<String>,
    price: Price,
    #[serde(default)]
    description: Option<String>,
}

impl From<CatalogProduct> for Product {
    fn from(product: CatalogProduct) -> Self {
        Self {
            id: product.id,
            name: product.name.unwrap_or_default(),
            price: product.price,
            description: product.description.unwrap_or_default(),
        }
    }
}

/// Where a catalog identifier points.
#[derive(Debug, Clone)]
enum Target {
    Http(Url),
    /// Anything that cannot be requested: a non-http scheme such as `gid://`,
    /// or a string that is not a URL at all.
    Unresolvable(String),
}

impl Target {
    fn resolve(source: &str) -> Self {
        match Url::parse(source) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Http(url),
            _ => Self::Unresolvable(source.to_string()),
        }
    }
}

/// Catalog source backed by a remote identifier.
#[derive(Debug, Clone)]
pub struct RemoteCatalog {
    client: reqwest::Client,
    target: Target,
}

impl RemoteCatalog {
    /// Create a catalog source for an opaque identifier.
    ///
    /// Resolution happens up front; an unresolvable identifier still builds
    /// a source, it just fails on every fetch.
    #[must_use]
    pub fn new(client: reqwest::Client, source: &str) -> Self {
        let target = Target::resolve(source);
        if let Target::Unresolvable(source) = &target {
            tracing::warn!(%source, "Catalog source is not an http(s) URL; loads will fail");
        }
        Self { client, target }
    }

    /// Whether the identifier resolved to something fetchable.
    #[must_use]
    pub const fn is_resolvable(&self) -> bool {
        matches!(self.target, Target::Http(_))
    }
}

impl CatalogSource for RemoteCatalog {
    #[instrument(skip(self))]
    async fn fetch_catalog(&self) -> Result<Vec<Product>, ApiError> {
        let url = match &self.target {
            Target::Http(url) => url.clone(),
            Target::Unresolvable(source) => {
                return Err(ApiError::UnsupportedSource(source.clone()));
            }
        };

        let response = self.client.get(url).send().await?;
        let response = check_status(response).await?;
        let text = response.text().await?;
        let body: CatalogBody = serde_json::from_str(&text)?;

        debug!(count = body.products.len(), "Fetched catalog");
        Ok(body.products.into_iter().map(Product::from).collect())
    }
}
