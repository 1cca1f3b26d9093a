//! Session-local shopping cart.
//!
//! The cart keeps one entry per product, in the order products were first
//! added. Every operation is total: unknown ids and non-positive quantities
//! are no-ops or removals, never errors.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// One product and how many of it are in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartEntry {
    /// Product id of this entry.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// An insertion-ordered collection of cart entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing entry in place, or appends a new entry with
    /// quantity 1.
    pub fn add(&mut self, product: &Product) {
        if let Some(entry) = self.entry_mut(product.id) {
            entry.quantity = entry.quantity.saturating_add(1);
        } else {
            self.entries.push(CartEntry {
                product: product.clone(),
                quantity: 1,
            });
        }
    }

    /// Set the quantity of the entry for `id`.
    ///
    /// A quantity of zero or less removes the entry. Ids not in the cart are
    /// left alone.
    pub fn update_quantity(&mut self, id: ProductId, new_quantity: i64) {
        if new_quantity <= 0 {
            self.remove(id);
            return;
        }

        if let Some(entry) = self.entry_mut(id) {
            entry.quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        }
    }

    /// Remove the entry for `id` if present.
    pub fn remove(&mut self, id: ProductId) {
        self.entries.retain(|entry| entry.id() != id);
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of price times quantity over all entries.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.entries.iter().map(CartEntry::line_price).sum()
    }

    /// Sum of quantities over all entries.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.quantity))
            .sum()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Entry for `id`, if any.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, id: ProductId) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|entry| entry.id() == id)
    }
}
