//! Shopview Core - Shared types library.
//!
//! This crate provides the domain types used by the `shopview-storefront`
//! views: products as they arrive from the remote catalog, the client-held
//! cart, and the lifecycle states a view renders from.
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no HTTP clients, no async runtime. Everything here can be exercised with
//! plain unit tests.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, products, cart and view states

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
