//! View models for the catalog and cart views.
//!
//! Each view is a [`mount::Mount`] of plain state plus the remote source it
//! reads from. Operations return `'static` futures holding only a weak
//! [`mount::Scope`] and the source, so a view can be torn down while a
//! request is in flight; the late result is then dropped and the operation
//! reports [`ViewError::Unmounted`].
//!
//! Local state changes only after the remote call succeeded. A failed call
//! leaves the state exactly as it was.

pub mod cart;
pub mod catalog;
pub mod mount;
pub mod registry;

pub use cart::{CartState, CartViewer};
pub use catalog::{CatalogState, CatalogViewer};
pub use mount::{Mount, Scope};
pub use registry::{MountId, ViewRegistry};

use shopview_core::{Product, ViewState};
use thiserror::Error;

use crate::api::ApiError;

/// A user-triggered remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchProducts,
    AddToCart,
    RemoveFromCart,
}

impl Operation {
    /// The message shown to the user when the operation fails, whatever the
    /// underlying cause.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::FetchProducts => "Failed to fetch data from the API",
            Self::AddToCart => "Failed to add product to cart",
            Self::RemoveFromCart => "Failed to remove product from cart",
        }
    }
}

/// Errors reported by view operations.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The remote call failed. Displays as the operation's fixed message.
    #[error("{}", .operation.failure_message())]
    Failed {
        operation: Operation,
        #[source]
        source: ApiError,
    },

    /// The view was torn down before the result arrived; nothing was applied.
    #[error("View was unmounted before the operation completed")]
    Unmounted,
}

impl ViewError {
    fn failed(operation: Operation, source: ApiError) -> Self {
        tracing::warn!(
            error = %source,
            kind = ?source.kind(),
            operation = ?operation,
            "View operation failed"
        );
        Self::Failed { operation, source }
    }

    /// Message to show the user, if this error is user-facing.
    #[must_use]
    pub const fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Failed { operation, .. } => Some(operation.failure_message()),
            Self::Unmounted => None,
        }
    }
}

/// Apply the result of an initial load to a view's state.
fn settle_load(
    status: &mut ViewState,
    products: &mut Vec<Product>,
    result: Result<Vec<Product>, ApiError>,
) -> Result<(), ViewError> {
    match result {
        Ok(fetched) => {
            if status.ready() {
                *products = fetched;
            }
            Ok(())
        }
        Err(source) => {
            status.fail(Operation::FetchProducts.failure_message());
            Err(ViewError::failed(Operation::FetchProducts, source))
        }
    }
}

fn discarded(operation: Operation) -> ViewError {
    tracing::debug!(operation = ?operation, "Result arrived after unmount; discarded");
    ViewError::Unmounted
}
