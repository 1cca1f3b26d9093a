//! The product catalog.
//!
//! A catalog is fixed for the lifetime of the process. It is either the
//! built-in TechStore catalog or a JSON document loaded at startup:
//!
//! ```json
//! {
//!   "currency": "EUR",
//!   "products": [
//!     {
//!       "id": 1,
//!       "name": "MacBook Pro 14\"",
//!       "price": "2399",
//!       "image": "https://images.unsplash.com/photo-1517336714731-489689fd1ca8?w=300&h=300&fit=crop",
//!       "category": "Électronique",
//!       "rating": "4.8",
//!       "description": "Ordinateur portable haute performance avec puce M2"
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexSet;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Category, CategoryFilter, CurrencyCode, Price, ProductId};

/// Highest rating a product can carry.
const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Errors raised while building or loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
    #[error("product {id} has rating {rating}, expected 0 to 5")]
    RatingOutOfRange { id: ProductId, rating: Decimal },
    #[error("product {0} has an empty name")]
    EmptyName(ProductId),
    #[error("product {0} has an empty category")]
    EmptyCategory(ProductId),
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog document: {0}")]
    Json(#[from] serde_json::Error),
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URI, resolved by the browser.
    pub image: String,
    pub category: Category,
    /// Average rating between 0 and 5.
    pub rating: Decimal,
    pub description: String,
}

/// Serialized form of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    currency: CurrencyCode,
    products: Vec<Product>,
}

/// An immutable, validated list of products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
    currency: CurrencyCode,
}

impl Catalog {
    /// Build a catalog, validating every product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on duplicate ids, negative prices, ratings
    /// outside 0..=5, or empty names and categories.
    pub fn new(products: Vec<Product>, currency: CurrencyCode) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
            if product.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(product.id));
            }
            if product.category.as_str().trim().is_empty() {
                return Err(CatalogError::EmptyCategory(product.id));
            }
            if product.price.is_negative() {
                return Err(CatalogError::NegativePrice(product.id));
            }
            if product.rating < Decimal::ZERO || product.rating > MAX_RATING {
                return Err(CatalogError::RatingOutOfRange {
                    id: product.id,
                    rating: product.rating,
                });
            }
        }

        Ok(Self { products, currency })
    }

    /// Parse and validate a JSON catalog document.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Json` for malformed documents, or a validation
    /// error as in [`Catalog::new`].
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::new(document.products, document.currency)
    }

    /// Read and validate a JSON catalog file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, otherwise as
    /// [`Catalog::from_json_str`].
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            products = catalog.len(),
            "Loaded catalog file"
        );
        Ok(catalog)
    }

    /// The built-in TechStore catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            products: builtin_products(),
            currency: CurrencyCode::EUR,
        }
    }

    /// Products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Display currency of this catalog.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The category chips: `All` followed by each distinct category in
    /// first-occurrence order.
    #[must_use]
    pub fn categories(&self) -> Vec<CategoryFilter> {
        let distinct: IndexSet<&Category> =
            self.products.iter().map(|product| &product.category).collect();

        std::iter::once(CategoryFilter::All)
            .chain(
                distinct
                    .into_iter()
                    .map(|category| CategoryFilter::Only(category.clone())),
            )
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn product(
    id: i32,
    name: &str,
    price: i64,
    image: &str,
    category: &str,
    rating_tenths: i64,
    description: &str,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::from_units(price),
        image: image.to_string(),
        category: Category::new(category),
        rating: Decimal::new(rating_tenths, 1),
        description: description.to_string(),
    }
}

fn builtin_products() -> Vec<Product> {
    vec![
        product(
            1,
            "MacBook Pro 14\"",
            2399,
            "https://images.unsplash.com/photo-1517336714731-489689fd1ca8?w=300&h=300&fit=crop",
            "Électronique",
            48,
            "Ordinateur portable haute performance avec puce M2",
        ),
        product(
            2,
            "iPhone 15 Pro",
            1199,
            "https://images.unsplash.com/photo-1592899677977-9c10ca588bbd?w=300&h=300&fit=crop",
            "Électronique",
            49,
            "Smartphone dernière génération avec appareil photo professionnel",
        ),
        product(
            3,
            "Nike Air Max",
            149,
            "https://images.unsplash.com/photo-1549298916-b41d501d3772?w=300&h=300&fit=crop",
            "Mode",
            46,
            "Baskets confortables pour le sport et le quotidien",
        ),
        product(
            4,
            "Casque Sony WH-1000XM5",
            399,
            "https://images.unsplash.com/photo-1583394838336-acd977736f90?w=300&h=300&fit=crop",
            "Audio",
            47,
            "Casque sans fil avec réduction de bruit active",
        ),
        product(
            5,
            "Montre Apple Watch",
            449,
            "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=300&h=300&fit=crop",
            "Électronique",
            45,
            "Montre connectée avec suivi santé et fitness",
        ),
        product(
            6,
            "Sac à dos Leather",
            89,
            "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=300&h=300&fit=crop",
            "Accessoires",
            44,
            "Sac à dos en cuir véritable, design minimaliste",
        ),
    ]
}
