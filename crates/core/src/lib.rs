//! TechStore Core - Catalog, category filter and cart state machine.
//!
//! This crate provides the domain logic behind the storefront view:
//! - [`catalog`] - The immutable product catalog and category derivation
//! - [`filter`] - Narrowing the catalog to one category
//! - [`cart`] - The ordered cart with add/update/remove and totals
//! - [`shop`] - The per-visitor state container and its actions
//!
//! # Architecture
//!
//! The core crate contains no HTTP, templating or session code. Every
//! operation on the cart and filter is synchronous and total, so the web
//! layer only has to load the state, dispatch one action and render.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod filter;
pub mod shop;
pub mod types;

pub use cart::{Cart, CartEntry};
pub use catalog::{Catalog, CatalogError, Product};
pub use filter::visible_products;
pub use shop::{Action, Redraw, ShopState, Snapshot};
pub use types::*;
