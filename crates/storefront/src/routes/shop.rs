//! Cart view route handlers.
//!
//! `GET /shop` mounts a new cart view and registers it under a fresh
//! [`MountId`]; the page's forms post back to `/shop/{mount_id}/...`. Each
//! action renders the whole page again. A failed remote write renders the
//! page with a notice the user has to dismiss.
//!
//! Action handlers clone the view out of the registry only for synchronous
//! steps. The remote call itself runs on a future that holds no strong
//! reference, so an evicted view is really gone even while its request is in
//! flight. The initial load is the exception: `index` keeps its handle and
//! renders the settled state itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::catalog::ProductView;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;
use crate::views::{CartState, CartViewer, MountId};

/// Cart action form data.
#[derive(Debug, Deserialize)]
pub struct CartForm {
    pub product_id: String,
}

/// Cart view page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopTemplate {
    pub mount_id: String,
    pub loading: bool,
    pub error: Option<String>,
    pub products: Vec<ProductView>,
    pub cart_items: Vec<ProductView>,
    pub cart_label: String,
    pub cart_visible: bool,
    pub notice: Option<&'static str>,
}

impl ShopTemplate {
    #[must_use]
    pub fn new(mount_id: MountId, state: &CartState, notice: Option<&'static str>) -> Self {
        Self {
            mount_id: mount_id.to_string(),
            loading: state.status.is_loading(),
            error: state.status.error().map(String::from),
            products: state.products.iter().map(ProductView::from).collect(),
            cart_items: state.cart.items().iter().map(ProductView::from).collect(),
            cart_label: state.cart.label(),
            cart_visible: state.cart_visibility.is_visible(),
            notice,
        }
    }
}

/// Render the current state of a mounted view, or send the visitor to a
/// fresh one if it is gone.
async fn render(state: &AppState, mount_id: MountId, notice: Option<&'static str>) -> Response {
    match state.carts().get(&mount_id).await {
        Some(view) => ShopTemplate::new(mount_id, &view.snapshot(), notice).into_response(),
        None => {
            debug!(%mount_id, "View no longer mounted; starting over");
            Redirect::to("/shop").into_response()
        }
    }
}

/// Mount, load and display a new cart view.
///
/// The first render comes from the handle held here, so it does not depend
/// on the view still being in the registry once the load settles.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Response {
    let (mount_id, view) = state.carts().mount(CartViewer::new(state.shop())).await;

    if let Err(e) = view.load().await {
        debug!(error = %e, "Cart view settled in error state");
    }

    ShopTemplate::new(mount_id, &view.snapshot(), None).into_response()
}

/// Display a mounted cart view without re-fetching.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(mount_id): Path<MountId>) -> Response {
    render(&state, mount_id, None).await
}

/// Add a listed product to the cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Path(mount_id): Path<MountId>,
    Form(form): Form<CartForm>,
) -> Result<Response> {
    let Some(view) = state.carts().get(&mount_id).await else {
        return Ok(Redirect::to("/shop").into_response());
    };
    let product = view
        .snapshot()
        .find_product(&form.product_id)
        .cloned()
        .ok_or_else(|| AppError::BadRequest(format!("unknown product {}", form.product_id)))?;
    let add = view.add_to_cart(product);
    drop(view);

    add_breadcrumb("cart", "Add to cart", Some(&[("product_id", form.product_id.as_str())]));
    let notice = add.await.err().and_then(|e| e.notice());

    Ok(render(&state, mount_id, notice).await)
}

/// Remove every cart entry for a product.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(mount_id): Path<MountId>,
    Form(form): Form<CartForm>,
) -> Result<Response> {
    let Some(view) = state.carts().get(&mount_id).await else {
        return Ok(Redirect::to("/shop").into_response());
    };
    let id = view
        .snapshot()
        .resolve_id(&form.product_id)
        .ok_or_else(|| AppError::BadRequest(format!("unknown product {}", form.product_id)))?;
    let remove = view.remove_from_cart(id);
    drop(view);

    add_breadcrumb(
        "cart",
        "Remove from cart",
        Some(&[("product_id", form.product_id.as_str())]),
    );
    let notice = remove.await.err().and_then(|e| e.notice());

    Ok(render(&state, mount_id, notice).await)
}

/// Show or hide the cart panel.
#[instrument(skip(state))]
pub async fn toggle(State(state): State<AppState>, Path(mount_id): Path<MountId>) -> Response {
    if let Some(view) = state.carts().get(&mount_id).await {
        view.toggle_cart();
    }
    render(&state, mount_id, None).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopview_core::{Price, Product, ProductId, ViewState};

    use super::*;

    fn shirt() -> Product {
        Product {
            id: ProductId::from(1),
            name: "Shirt".to_string(),
            price: Price::from(20),
            description: "d".to_string(),
        }
    }

    fn ready_state() -> CartState {
        CartState {
            status: ViewState::Ready,
            products: vec![shirt()],
            ..CartState::default()
        }
    }

    #[test]
    fn test_render_products_with_add_forms() {
        let id = MountId::new();
        let html = ShopTemplate::new(id, &ready_state(), None).render().unwrap();

        assert!(html.contains("Cart (0)"));
        assert!(html.contains("<h2>Shirt</h2>"));
        assert!(html.contains(&format!("action=\"/shop/{id}/cart/add\"")));
        assert!(html.contains("Add to Cart"));
        assert!(!html.contains("Your Cart"));
    }

    #[test]
    fn test_render_visible_empty_cart() {
        let mut state = ready_state();
        state.cart_visibility.toggle();
        let html = ShopTemplate::new(MountId::new(), &state, None)
            .render()
            .unwrap();

        assert!(html.contains("Your Cart"));
        assert!(html.contains("Your cart is empty!"));
        assert!(html.contains("Close Cart"));
    }

    #[test]
    fn test_render_visible_cart_with_items() {
        let id = MountId::new();
        let mut state = ready_state();
        state.cart.push(shirt());
        state.cart_visibility.toggle();
        let html = ShopTemplate::new(id, &state, None).render().unwrap();

        assert!(html.contains("Cart (1)"));
        assert!(html.contains(&format!("action=\"/shop/{id}/cart/remove\"")));
        assert!(!html.contains("Your cart is empty!"));
    }

    #[test]
    fn test_render_notice() {
        let html = ShopTemplate::new(
            MountId::new(),
            &ready_state(),
            Some("Failed to add product to cart"),
        )
        .render()
        .unwrap();

        assert!(html.contains("role=\"alertdialog\""));
        assert!(html.contains("Failed to add product to cart"));
        // Shown open on a full re-render; nothing on the page makes it modal
        assert!(!html.contains("aria-modal"));
    }

    #[test]
    fn test_render_error_state() {
        let state = CartState {
            status: ViewState::Error("Failed to fetch data from the API".to_string()),
            ..CartState::default()
        };
        let html = ShopTemplate::new(MountId::new(), &state, None)
            .render()
            .unwrap();

        assert!(html.contains("Error: Failed to fetch data from the API"));
        assert!(!html.contains("Add to Cart"));
    }
}
