//! Catalog view route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use shopview_core::Product;
use tracing::{debug, instrument};

use crate::filters;
use crate::state::AppState;
use crate::views::{CatalogState, CatalogViewer};

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub description: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
        }
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogIndexTemplate {
    pub loading: bool,
    pub error: Option<String>,
    pub products: Vec<ProductView>,
}

impl From<CatalogState> for CatalogIndexTemplate {
    fn from(state: CatalogState) -> Self {
        Self {
            loading: state.status.is_loading(),
            error: state.status.error().map(String::from),
            products: state.products.iter().map(ProductView::from).collect(),
        }
    }
}

/// Display the catalog.
///
/// Every request mounts a fresh view, loads it once and renders the settled
/// state. The view is torn down when the response is built.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let view = CatalogViewer::new(state.catalog());

    if let Err(e) = view.load().await {
        debug!(error = %e, "Catalog view settled in error state");
    }

    CatalogIndexTemplate::from(view.snapshot())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopview_core::{Price, ProductId, ViewState};

    use super::*;

    fn shirt() -> Product {
        Product {
            id: ProductId::from(1),
            name: "Shirt".to_string(),
            price: Price::from(20),
            description: "Cotton tee".to_string(),
        }
    }

    #[test]
    fn test_render_loading() {
        let html = CatalogIndexTemplate::from(CatalogState::default())
            .render()
            .unwrap();
        assert!(html.contains("Loading..."));
        assert!(!html.contains("class=\"product-list\""));
    }

    #[test]
    fn test_render_error() {
        let state = CatalogState {
            status: ViewState::Error("Failed to fetch data from the API".to_string()),
            products: Vec::new(),
        };
        let html = CatalogIndexTemplate::from(state).render().unwrap();
        assert!(html.contains("Error: Failed to fetch data from the API"));
    }

    #[test]
    fn test_render_ready() {
        let state = CatalogState {
            status: ViewState::Ready,
            products: vec![shirt()],
        };
        let html = CatalogIndexTemplate::from(state).render().unwrap();

        assert!(html.contains("Product List"));
        assert!(html.contains("<h2>Shirt</h2>"));
        assert!(html.contains("Price: $20"));
        assert!(html.contains("Cotton tee"));
        assert_eq!(html.matches("class=\"product-item\"").count(), 1);
    }

    #[test]
    fn test_stylesheet_carries_asset_version() {
        let html = CatalogIndexTemplate::from(CatalogState::default())
            .render()
            .unwrap();
        let (_, rest) = html.split_once("/static/css/main.css?v=").unwrap();
        let version: String = rest.chars().take_while(char::is_ascii_hexdigit).collect();
        assert_eq!(version.len(), 8);
    }

    #[test]
    fn test_render_escapes_remote_text() {
        let mut product = shirt();
        product.name = "<script>alert(1)</script>".to_string();
        let state = CatalogState {
            status: ViewState::Ready,
            products: vec![product],
        };
        let html = CatalogIndexTemplate::from(state).render().unwrap();
        assert!(!html.contains("<script>"));
    }
}
