//! Core types for shopview.
//!
//! This module provides type-safe wrappers for the catalog domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use cart::Cart;
pub use id::ProductId;
pub use price::Price;
pub use product::{CartItem, Product};
pub use status::{CartVisibility, ViewState};
