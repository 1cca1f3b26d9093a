//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Storefront page (catalog, filter, cart panel)
//! GET  /health                 - Health check
//!
//! # Catalog
//! POST /category               - Select a category chip
//!
//! # Cart (post/redirect/get)
//! POST /cart/add               - Add one unit of a product
//! POST /cart/update            - Set the quantity of an entry
//! POST /cart/remove            - Remove an entry
//! POST /cart/open              - Open the cart panel
//! POST /cart/close             - Close the cart panel
//!
//! # Checkout
//! POST /checkout               - Request checkout
//! ```

pub mod cart;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/category", post(home::select_category))
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
}
