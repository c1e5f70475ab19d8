//! Catalog view: a read-only product list.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shopview_core::{Product, ViewState};

use super::mount::Mount;
use super::{Operation, ViewError, discarded, settle_load};
use crate::api::CatalogSource;

/// What the catalog view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogState {
    pub status: ViewState,
    pub products: Vec<Product>,
}

/// A mounted catalog view.
pub struct CatalogViewer<S> {
    source: Arc<S>,
    mount: Mount<CatalogState>,
    load_issued: AtomicBool,
}

impl<S: CatalogSource> CatalogViewer<S> {
    /// Mount a new view in the `Loading` state. Nothing is fetched until
    /// [`load`](Self::load) runs.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            mount: Mount::new(CatalogState::default()),
            load_issued: AtomicBool::new(false),
        }
    }

    /// Issue the view's single read request and settle the state.
    ///
    /// Only the first call fetches; later calls resolve immediately without
    /// touching the source.
    ///
    /// # Errors
    ///
    /// `ViewError::Failed` if the fetch failed (the view is then in
    /// `Error`), `ViewError::Unmounted` if the view was dropped first.
    pub fn load(&self) -> impl Future<Output = Result<(), ViewError>> + Send + use<S> {
        let first = !self.load_issued.swap(true, Ordering::SeqCst);
        let source = Arc::clone(&self.source);
        let scope = self.mount.scope();

        async move {
            if !first {
                return Ok(());
            }
            let result = source.fetch_catalog().await;
            scope
                .update(|state| settle_load(&mut state.status, &mut state.products, result))
                .unwrap_or_else(|| Err(discarded(Operation::FetchProducts)))
        }
    }

    /// Copy of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> CatalogState {
        self.mount.read(Clone::clone)
    }
}
