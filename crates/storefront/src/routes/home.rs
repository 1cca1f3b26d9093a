//! Storefront page and category selection.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use techstore_core::{Action, CategoryFilter, CurrencyCode, Product, ShopState, Snapshot};

use super::cart::CartView;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::session::{dispatch, load_shop_state};
use crate::state::AppState;

/// Category chip display data for templates.
#[derive(Clone)]
pub struct CategoryChipView {
    pub label: String,
    /// Value posted back to `/category`.
    pub value: String,
    pub active: bool,
}

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub image: String,
    pub category: String,
    pub rating: String,
    pub description: String,
}

impl ProductCardView {
    fn new(product: &Product, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: currency.format(product.price),
            image: product.image.clone(),
            category: product.category.to_string(),
            rating: product.rating.normalize().to_string(),
            description: product.description.clone(),
        }
    }
}

/// Category chip form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub category: String,
}

/// Storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/storefront.html")]
pub struct StorefrontTemplate {
    pub store_name: String,
    pub categories: Vec<CategoryChipView>,
    pub products: Vec<ProductCardView>,
    pub cart: CartView,
    pub cart_open: bool,
}

impl StorefrontTemplate {
    /// Render data for the visitor's current state.
    #[must_use]
    pub fn new(state: &AppState, shop: &ShopState) -> Self {
        let catalog = state.catalog();
        Self::from_snapshot(
            &state.config().store_name,
            &shop.snapshot(catalog),
            catalog.currency(),
        )
    }

    fn from_snapshot(store_name: &str, snapshot: &Snapshot<'_>, currency: CurrencyCode) -> Self {
        let categories = snapshot
            .categories
            .iter()
            .map(|filter| CategoryChipView {
                label: filter.label().to_string(),
                value: match filter {
                    CategoryFilter::All => String::new(),
                    CategoryFilter::Only(category) => category.to_string(),
                },
                active: filter == snapshot.selected,
            })
            .collect();

        let products = snapshot
            .products
            .iter()
            .map(|product| ProductCardView::new(product, currency))
            .collect();

        Self {
            store_name: store_name.to_string(),
            categories,
            products,
            cart: CartView::new(snapshot.cart, currency),
            cart_open: snapshot.cart_open,
        }
    }
}

/// Display the storefront page.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<StorefrontTemplate> {
    let shop = load_shop_state(&session).await?;
    Ok(StorefrontTemplate::new(&state, &shop))
}

/// Select a category chip.
#[instrument(skip(state, session))]
pub async fn select_category(
    State(state): State<AppState>,
    session: Session,
    form: std::result::Result<Form<CategoryForm>, FormRejection>,
) -> Result<Redirect> {
    let Form(form) = form.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let Ok(filter) = form.category.parse::<CategoryFilter>();

    add_breadcrumb("catalog", "Selected category", Some(&[("category", filter.label())]));
    dispatch(&session, state.catalog(), Action::SelectCategory(filter)).await?;

    Ok(Redirect::to("/"))
}
