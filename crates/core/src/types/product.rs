//! Catalog products.

use crate::types::{Price, ProductId};

/// A product from a remote catalog.
///
/// Built from whatever the source sent; nothing is validated or normalized.
/// Each source has its own wire shape (the catalog names products with
/// `name`, the shop API with `title`) and converts into this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
}

/// An entry in the cart. Same shape as a [`Product`]; there is no quantity,
/// adding a product twice yields two entries.
pub type CartItem = Product;
