//! The client-held cart.
//!
//! The cart is a plain list: it only records which products the user added
//! and has not removed since. It is never reconciled with the remote cart;
//! callers mutate it only after the matching remote write succeeded.

use crate::types::{CartItem, ProductId};

/// Ordered list of cart entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an entry. Duplicates are kept as separate entries.
    pub fn push(&mut self, item: CartItem) {
        self.items.push(item);
    }

    /// Remove every entry with the given identifier, returning how many were
    /// removed. Other entries keep their order.
    pub fn remove_all(&mut self, id: &ProductId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        before - self.items.len()
    }

    /// Find the identifier of an entry from its textual form.
    #[must_use]
    pub fn resolve_id(&self, raw: &str) -> Option<&ProductId> {
        self.items
            .iter()
            .map(|item| &item.id)
            .find(|id| id.matches(raw))
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Label for the cart toggle button, e.g. `Cart (2)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Cart ({})", self.items.len())
    }
}
