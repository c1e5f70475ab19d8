//! Cart view: the product list plus a client-held cart.
//!
//! Adding or removing issues the remote write first; the local cart only
//! changes once the write succeeded. Calls are not serialized against each
//! other, so rapid repeated actions may complete in any order.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shopview_core::{Cart, CartVisibility, Product, ProductId, ViewState};

use super::mount::Mount;
use super::{Operation, ViewError, discarded, settle_load};
use crate::api::ShopApi;

/// What the cart view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    pub status: ViewState,
    pub products: Vec<Product>,
    pub cart: Cart,
    pub cart_visibility: CartVisibility,
}

impl CartState {
    /// Find a listed product from the textual form of its id.
    #[must_use]
    pub fn find_product(&self, raw: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id.matches(raw))
    }

    /// Resolve the textual form of an id against the cart, then the product
    /// list.
    #[must_use]
    pub fn resolve_id(&self, raw: &str) -> Option<ProductId> {
        self.cart
            .resolve_id(raw)
            .or_else(|| self.find_product(raw).map(|product| &product.id))
            .cloned()
    }
}

/// A mounted cart view.
pub struct CartViewer<A> {
    api: Arc<A>,
    mount: Mount<CartState>,
    load_issued: AtomicBool,
}

impl<A: ShopApi> CartViewer<A> {
    /// Mount a new view: `Loading`, empty cart, cart panel hidden.
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            mount: Mount::new(CartState::default()),
            load_issued: AtomicBool::new(false),
        }
    }

    /// Issue the view's single product read and settle the state.
    ///
    /// Only the first call fetches; later calls resolve immediately.
    ///
    /// # Errors
    ///
    /// `ViewError::Failed` if the fetch failed (the view is then in
    /// `Error`), `ViewError::Unmounted` if the view was dropped first.
    pub fn load(&self) -> impl Future<Output = Result<(), ViewError>> + Send + use<A> {
        let first = !self.load_issued.swap(true, Ordering::SeqCst);
        let api = Arc::clone(&self.api);
        let scope = self.mount.scope();

        async move {
            if !first {
                return Ok(());
            }
            let result = api.list_products().await;
            scope
                .update(|state| settle_load(&mut state.status, &mut state.products, result))
                .unwrap_or_else(|| Err(discarded(Operation::FetchProducts)))
        }
    }

    /// Add `product` to the cart once the remote cart accepted it.
    ///
    /// # Errors
    ///
    /// `ViewError::Failed` (cart untouched) if the remote write failed,
    /// `ViewError::Unmounted` if the view was dropped before it completed.
    pub fn add_to_cart(
        &self,
        product: Product,
    ) -> impl Future<Output = Result<(), ViewError>> + Send + use<A> {
        let api = Arc::clone(&self.api);
        let scope = self.mount.scope();

        async move {
            if let Err(source) = api.add_to_cart(&product.id).await {
                return Err(ViewError::failed(Operation::AddToCart, source));
            }
            scope
                .update(|state| state.cart.push(product))
                .ok_or_else(|| discarded(Operation::AddToCart))
        }
    }

    /// Remove every cart entry with `id` once the remote cart deleted it.
    ///
    /// # Errors
    ///
    /// `ViewError::Failed` (cart untouched) if the remote write failed,
    /// `ViewError::Unmounted` if the view was dropped before it completed.
    pub fn remove_from_cart(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<(), ViewError>> + Send + use<A> {
        let api = Arc::clone(&self.api);
        let scope = self.mount.scope();

        async move {
            if let Err(source) = api.remove_from_cart(&id).await {
                return Err(ViewError::failed(Operation::RemoveFromCart, source));
            }
            scope
                .update(|state| {
                    state.cart.remove_all(&id);
                })
                .ok_or_else(|| discarded(Operation::RemoveFromCart))
        }
    }

    /// Show or hide the cart panel, returning whether it is now visible.
    pub fn toggle_cart(&self) -> bool {
        self.mount.update(|state| state.cart_visibility.toggle())
    }

    /// Copy of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.mount.read(Clone::clone)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::views::testing::{FakeShop, product};

    async fn loaded(api: FakeShop) -> (Arc<FakeShop>, CartViewer<FakeShop>) {
        let api = Arc::new(api);
        let view = CartViewer::new(Arc::clone(&api));
        view.load().await.unwrap();
        (api, view)
    }

    #[tokio::test]
    async fn test_initial_state() {
        let view = CartViewer::new(Arc::new(FakeShop::new(Vec::new())));
        let state = view.snapshot();

        assert!(state.status.is_loading());
        assert!(state.cart.is_empty());
        assert!(!state.cart_visibility.is_visible());
    }

    #[tokio::test]
    async fn test_load_success() {
        let (_, view) = loaded(FakeShop::new(vec![
            product(1, "Shirt", 20),
            product(2, "Hat", 15),
            product(3, "Socks", 5),
        ]))
        .await;

        let state = view.snapshot();
        assert!(state.status.is_ready());
        assert_eq!(state.products.len(), 3);
    }

    #[tokio::test]
    async fn test_load_failure() {
        let view = CartViewer::new(Arc::new(FakeShop::failing_load()));

        let err = view.load().await.unwrap_err();

        assert_eq!(err.notice(), Some("Failed to fetch data from the API"));
        let state = view.snapshot();
        assert!(!state.status.is_loading());
        assert_eq!(
            state.status.error(),
            Some("Failed to fetch data from the API")
        );
    }

    #[tokio::test]
    async fn test_add_then_remove_scenario() {
        let shirt = product(1, "Shirt", 20);
        let (api, view) = loaded(FakeShop::new(vec![shirt.clone()])).await;

        view.add_to_cart(shirt.clone()).await.unwrap();
        let state = view.snapshot();
        assert_eq!(state.cart.items(), std::slice::from_ref(&shirt));
        assert_eq!(state.cart.label(), "Cart (1)");

        view.remove_from_cart(ProductId::from(1)).await.unwrap();
        let state = view.snapshot();
        assert!(state.cart.is_empty());
        assert_eq!(state.cart.label(), "Cart (0)");

        assert_eq!(api.writes(), vec!["POST 1", "DELETE 1"]);
    }

    #[tokio::test]
    async fn test_add_same_product_twice_keeps_two_entries() {
        let shirt = product(1, "Shirt", 20);
        let (_, view) = loaded(FakeShop::new(vec![shirt.clone()])).await;

        view.add_to_cart(shirt.clone()).await.unwrap();
        view.add_to_cart(shirt).await.unwrap();

        assert_eq!(view.snapshot().cart.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_drops_all_matches_and_keeps_others() {
        let shirt = product(1, "Shirt", 20);
        let hat = product(2, "Hat", 15);
        let (_, view) = loaded(FakeShop::new(vec![shirt.clone(), hat.clone()])).await;

        view.add_to_cart(shirt.clone()).await.unwrap();
        view.add_to_cart(hat.clone()).await.unwrap();
        view.add_to_cart(shirt).await.unwrap();
        view.remove_from_cart(ProductId::from(1)).await.unwrap();

        assert_eq!(view.snapshot().cart.items(), std::slice::from_ref(&hat));
    }

    #[tokio::test]
    async fn test_failed_add_leaves_cart_unchanged() {
        let shirt = product(1, "Shirt", 20);
        let (_, view) = loaded(FakeShop::failing_writes(vec![shirt.clone()])).await;
        let before = view.snapshot().cart;

        let err = view.add_to_cart(shirt).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to add product to cart");
        assert_eq!(view.snapshot().cart, before);
    }

    #[tokio::test]
    async fn test_failed_remove_leaves_cart_unchanged() {
        let shirt = product(1, "Shirt", 20);
        let (api, view) = loaded(FakeShop::new(vec![shirt.clone()])).await;
        view.add_to_cart(shirt).await.unwrap();
        api.set_fail_writes(true);

        let err = view.remove_from_cart(ProductId::from(1)).await.unwrap_err();

        assert_eq!(err.notice(), Some("Failed to remove product from cart"));
        assert_eq!(view.snapshot().cart.len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_visibility_without_calls() {
        let (api, view) = loaded(FakeShop::new(Vec::new())).await;
        let calls = api.calls();

        assert!(view.toggle_cart());
        assert!(!view.toggle_cart());

        assert!(!view.snapshot().cart_visibility.is_visible());
        assert_eq!(api.calls(), calls);
    }

    #[tokio::test]
    async fn test_add_completing_after_unmount_is_discarded() {
        let shirt = product(1, "Shirt", 20);
        let api = Arc::new(FakeShop::gated(vec![shirt.clone()]));
        let view = CartViewer::new(Arc::clone(&api));
        api.release();
        view.load().await.unwrap();

        let pending = tokio::spawn(view.add_to_cart(shirt));
        drop(view);
        api.release();

        let result = pending.await.unwrap();
        assert!(matches!(result, Err(ViewError::Unmounted)));
    }

    #[test]
    fn test_resolve_id_prefers_cart_then_products() {
        let mut state = CartState {
            products: vec![product(1, "Shirt", 20), product(2, "Hat", 15)],
            ..CartState::default()
        };
        state.cart.push(product(3, "Socks", 5));

        assert_eq!(state.resolve_id("3"), Some(ProductId::from(3)));
        assert_eq!(state.resolve_id("2"), Some(ProductId::from(2)));
        assert_eq!(state.resolve_id("9"), None);
        assert_eq!(state.find_product("1").map(|p| p.name.as_str()), Some("Shirt"));
    }
}
