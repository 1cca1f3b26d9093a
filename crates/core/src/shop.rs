//! Per-visitor shop state and the actions that drive it.
//!
//! `ShopState` is the single state container behind the storefront view: the
//! cart, the selected category and whether the cart panel is open. Actions
//! mutate it synchronously; after each dispatched action the one registered
//! [`Redraw`] subscriber recomputes the view from scratch.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::catalog::{Catalog, Product};
use crate::filter::visible_products;
use crate::types::{CategoryFilter, Price, ProductId};

/// A discrete user action on the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// "Ajouter" on a product card.
    AddToCart(ProductId),
    /// Quantity +/- on a cart entry.
    UpdateQuantity { id: ProductId, quantity: i64 },
    /// Remove control on a cart entry.
    RemoveFromCart(ProductId),
    /// Category chip.
    SelectCategory(CategoryFilter),
    /// Cart icon.
    OpenCart,
    /// Close control or backdrop of the cart panel.
    CloseCart,
    /// "Procéder au paiement". Checkout is not wired to a provider.
    Checkout,
}

/// Subscriber notified after every dispatched action.
///
/// In-process views register one through [`ShopState::dispatch_with`]. The
/// HTTP storefront has no long-lived view to notify: each action is a form
/// post answered with a redirect, and the redraw is the `GET /` that follows,
/// which renders from [`ShopState::snapshot`].
pub trait Redraw {
    /// Render the current state.
    fn redraw(&mut self, state: &ShopState, catalog: &Catalog);
}

impl<F> Redraw for F
where
    F: FnMut(&ShopState, &Catalog),
{
    fn redraw(&mut self, state: &ShopState, catalog: &Catalog) {
        self(state, catalog);
    }
}

/// Cart, category selection and panel flag for one visitor session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopState {
    pub cart: Cart,
    pub selected: CategoryFilter,
    pub cart_open: bool,
}

/// Everything the view shows, derived from a `ShopState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<'a> {
    pub categories: Vec<CategoryFilter>,
    pub selected: &'a CategoryFilter,
    pub products: Vec<&'a Product>,
    pub cart: &'a Cart,
    pub cart_open: bool,
    pub total_items: u64,
    pub total_price: Price,
}

impl ShopState {
    /// Fresh state: empty cart, all categories, panel closed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action. Returns whether the state changed.
    ///
    /// Adding an id that is not in the catalog does nothing.
    pub fn dispatch(&mut self, action: Action, catalog: &Catalog) -> bool {
        let before = self.clone();

        match action {
            Action::AddToCart(id) => match catalog.get(id) {
                Some(product) => self.cart.add(product),
                None => tracing::debug!(product_id = %id, "Ignoring add of unknown product"),
            },
            Action::UpdateQuantity { id, quantity } => self.cart.update_quantity(id, quantity),
            Action::RemoveFromCart(id) => self.cart.remove(id),
            Action::SelectCategory(filter) => self.selected = filter,
            Action::OpenCart => self.cart_open = true,
            Action::CloseCart => self.cart_open = false,
            Action::Checkout => {
                tracing::info!(
                    items = self.cart.total_items(),
                    total = %self.cart.total_price(),
                    "Checkout requested"
                );
            }
        }

        *self != before
    }

    /// Apply one action, then notify `redraw` exactly once.
    pub fn dispatch_with<R: Redraw + ?Sized>(
        &mut self,
        action: Action,
        catalog: &Catalog,
        redraw: &mut R,
    ) -> bool {
        let changed = self.dispatch(action, catalog);
        redraw.redraw(self, catalog);
        changed
    }

    /// Derive the view data for this state.
    #[must_use]
    pub fn snapshot<'a>(&'a self, catalog: &'a Catalog) -> Snapshot<'a> {
        Snapshot {
            categories: catalog.categories(),
            selected: &self.selected,
            products: visible_products(catalog, &self.selected),
            cart: &self.cart,
            cart_open: self.cart_open,
            total_items: self.cart.total_items(),
            total_price: self.cart.total_price(),
        }
    }

    /// Drop everything, as on view teardown.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Category;

    #[test]
    fn test_new_state_defaults() {
        let state = ShopState::new();
        assert!(state.cart.is_empty());
        assert_eq!(state.selected, CategoryFilter::All);
        assert!(!state.cart_open);
    }

    #[test]
    fn test_dispatch_add_and_update() {
        let catalog = Catalog::builtin();
        let mut state = ShopState::new();
        assert!(state.dispatch(Action::AddToCart(ProductId::new(1)), &catalog));
        assert!(state.dispatch(
            Action::UpdateQuantity {
                id: ProductId::new(1),
                quantity: 3
            },
            &catalog
        ));
        assert_eq!(state.cart.total_items(), 3);
        assert!(state.dispatch(Action::RemoveFromCart(ProductId::new(1)), &catalog));
        assert!(state.cart.is_empty());
    }

    #[test]
    fn test_dispatch_unknown_product_is_noop() {
        let catalog = Catalog::builtin();
        let mut state = ShopState::new();
        assert!(!state.dispatch(Action::AddToCart(ProductId::new(77)), &catalog));
        assert!(!state.dispatch(Action::RemoveFromCart(ProductId::new(77)), &catalog));
        assert!(state.cart.is_empty());
    }

    #[test]
    fn test_panel_toggle() {
        let catalog = Catalog::builtin();
        let mut state = ShopState::new();
        assert!(state.dispatch(Action::OpenCart, &catalog));
        assert!(state.cart_open);
        assert!(!state.dispatch(Action::OpenCart, &catalog));
        assert!(state.dispatch(Action::CloseCart, &catalog));
        assert!(!state.cart_open);
    }

    #[test]
    fn test_checkout_is_noop() {
        let catalog = Catalog::builtin();
        let mut state = ShopState::new();
        state.dispatch(Action::AddToCart(ProductId::new(2)), &catalog);
        let before = state.clone();
        assert!(!state.dispatch(Action::Checkout, &catalog));
        assert_eq!(state, before);
    }

    #[test]
    fn test_select_category_filters_snapshot() {
        let catalog = Catalog::builtin();
        let mut state = ShopState::new();
        state.dispatch(
            Action::SelectCategory(CategoryFilter::Only(Category::new("Mode"))),
            &catalog,
        );
        let snapshot = state.snapshot(&catalog);
        assert_eq!(snapshot.products.len(), 1);
        assert_eq!(snapshot.products.first().unwrap().name, "Nike Air Max");
        assert_eq!(snapshot.categories.len(), 5);
    }

    #[test]
    fn test_snapshot_totals() {
        let catalog = Catalog::builtin();
        let mut state = ShopState::new();
        for id in [1, 2, 1] {
            state.dispatch(Action::AddToCart(ProductId::new(id)), &catalog);
        }
        let snapshot = state.snapshot(&catalog);
        assert_eq!(snapshot.total_items, 3);
        assert_eq!(snapshot.total_price, Price::from_units(5997));
        assert_eq!(snapshot.products.len(), 6);
    }

    #[test]
    fn test_redraw_called_once_per_action() {
        let catalog = Catalog::builtin();
        let mut state = ShopState::new();
        let mut redraws = Vec::new();
        let mut record = |state: &ShopState, _: &Catalog| redraws.push(state.cart.total_items());

        state.dispatch_with(Action::AddToCart(ProductId::new(3)), &catalog, &mut record);
        state.dispatch_with(Action::AddToCart(ProductId::new(3)), &catalog, &mut record);
        state.dispatch_with(Action::RemoveFromCart(ProductId::new(9)), &catalog, &mut record);

        assert_eq!(redraws, [1, 2, 2]);
    }

    #[test]
    fn test_reset() {
        let catalog = Catalog::builtin();
        let mut state = ShopState::new();
        state.dispatch(Action::AddToCart(ProductId::new(3)), &catalog);
        state.dispatch(Action::OpenCart, &catalog);
        state.reset();
        assert_eq!(state, ShopState::default());
    }

    #[test]
    fn test_state_serde_round_trip() {
        let catalog = Catalog::builtin();
        let mut state = ShopState::new();
        state.dispatch(Action::AddToCart(ProductId::new(4)), &catalog);
        state.dispatch(
            Action::SelectCategory(CategoryFilter::Only(Category::new("Audio"))),
            &catalog,
        );
        let value = serde_json::to_value(&state).unwrap();
        let restored: ShopState = serde_json::from_value(value).unwrap();
        assert_eq!(restored, state);
    }
}
