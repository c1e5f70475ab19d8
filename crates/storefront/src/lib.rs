//! Shopview Storefront library.
//!
//! Two server-rendered views over a remote product catalog:
//!
//! - the catalog view lists the products of a fixed source
//! - the cart view lists the shop API's products and keeps a client-held
//!   cart mirrored by the shop API's cart endpoints
//!
//! The crate is a library so the views, routes and clients can be tested
//! and reused; the binary in `main.rs` only wires configuration, logging and
//! the server loop.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
mod filters;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod views;
