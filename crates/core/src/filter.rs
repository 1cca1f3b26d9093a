//! Category filtering of the catalog.

use crate::catalog::{Catalog, Product};
use crate::types::CategoryFilter;

/// Products visible under `selected`, in catalog order.
///
/// `CategoryFilter::All` yields the whole catalog. A category with no
/// products yields an empty list.
#[must_use]
pub fn visible_products<'a>(catalog: &'a Catalog, selected: &CategoryFilter) -> Vec<&'a Product> {
    catalog
        .products()
        .iter()
        .filter(|product| selected.matches(&product.category))
        .collect()
}
