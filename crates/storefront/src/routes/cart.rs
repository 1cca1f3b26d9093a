//! Cart route handlers.
//!
//! Every cart action is a plain form post. Handlers load the visitor's shop
//! state from the session, apply one action, store it back and redirect to
//! the storefront page, which renders the updated badge and panel.

use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use techstore_core::{Action, Cart, CurrencyCode, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session::dispatch;
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    /// Quantity posted by the "-" control; 0 removes the entry.
    pub decrement: i64,
    /// Quantity posted by the "+" control.
    pub increment: i64,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total_price: String,
    pub total_items: u64,
}

impl CartView {
    /// Build the view of `cart` with prices in `currency`.
    #[must_use]
    pub fn new(cart: &Cart, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .entries()
                .iter()
                .map(|entry| CartItemView {
                    id: entry.id().as_i32(),
                    name: entry.product.name.clone(),
                    image: entry.product.image.clone(),
                    price: currency.format(entry.product.price),
                    quantity: entry.quantity,
                    decrement: i64::from(entry.quantity) - 1,
                    increment: i64::from(entry.quantity) + 1,
                })
                .collect(),
            total_price: currency.format(cart.total_price()),
            total_items: cart.total_items(),
        }
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Add to cart / remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: i32,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityForm {
    pub product_id: i32,
    pub quantity: i64,
}

fn form_body<T>(form: std::result::Result<Form<T>, FormRejection>) -> Result<T> {
    form.map(|Form(body)| body)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

/// Add one unit of a product to the cart ("Ajouter").
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    form: std::result::Result<Form<ProductForm>, FormRejection>,
) -> Result<Redirect> {
    let form = form_body(form)?;
    let id = ProductId::new(form.product_id);

    let Some(product) = state.catalog().get(id) else {
        tracing::warn!(product_id = %id, "Add to cart for unknown product");
        return Err(AppError::NotFound(format!("product {id}")));
    };

    let product_id = id.to_string();
    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[
            ("product_id", product_id.as_str()),
            ("name", product.name.as_str()),
        ]),
    );
    let shop = dispatch(&session, state.catalog(), Action::AddToCart(id)).await?;
    tracing::info!(
        product_id = %id,
        total_items = shop.cart.total_items(),
        "Added to cart"
    );

    Ok(Redirect::to("/"))
}

/// Set the quantity of a cart entry (+/- controls).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    form: std::result::Result<Form<UpdateQuantityForm>, FormRejection>,
) -> Result<Redirect> {
    let form = form_body(form)?;
    let id = ProductId::new(form.product_id);

    let product_id = id.to_string();
    let quantity = form.quantity.to_string();
    add_breadcrumb(
        "cart",
        "Updated quantity",
        Some(&[
            ("product_id", product_id.as_str()),
            ("quantity", quantity.as_str()),
        ]),
    );
    dispatch(
        &session,
        state.catalog(),
        Action::UpdateQuantity {
            id,
            quantity: form.quantity,
        },
    )
    .await?;

    Ok(Redirect::to("/"))
}

/// Remove an entry from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    form: std::result::Result<Form<ProductForm>, FormRejection>,
) -> Result<Redirect> {
    let form = form_body(form)?;
    let id = ProductId::new(form.product_id);

    let product_id = id.to_string();
    add_breadcrumb(
        "cart",
        "Removed from cart",
        Some(&[("product_id", product_id.as_str())]),
    );
    dispatch(&session, state.catalog(), Action::RemoveFromCart(id)).await?;

    Ok(Redirect::to("/"))
}

/// Open the cart panel (cart icon).
#[instrument(skip(state, session))]
pub async fn open(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    dispatch(&session, state.catalog(), Action::OpenCart).await?;
    Ok(Redirect::to("/"))
}

/// Close the cart panel (close control or backdrop).
#[instrument(skip(state, session))]
pub async fn close(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    dispatch(&session, state.catalog(), Action::CloseCart).await?;
    Ok(Redirect::to("/"))
}

/// "Procéder au paiement".
///
/// No checkout provider is wired up; the request is logged and the visitor
/// lands back on the storefront with the cart untouched.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    add_breadcrumb("cart", "Checkout requested", None);
    dispatch(&session, state.catalog(), Action::Checkout).await?;
    Ok(Redirect::to("/"))
}
