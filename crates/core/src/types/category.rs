//! Product categories and the category selection used to filter the catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Label shown for the synthetic "all categories" selection.
pub const ALL_LABEL: &str = "Tous";

/// A product category label (e.g., "Audio").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a category from its label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Get the category label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// The category selection applied to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind", content = "category")]
pub enum CategoryFilter {
    /// Every product is visible.
    #[default]
    All,
    /// Only products of this category are visible.
    Only(Category),
}

impl CategoryFilter {
    /// Whether a product in `category` passes this filter.
    #[must_use]
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == category,
        }
    }

    /// Label shown on the category chip.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_LABEL,
            Self::Only(category) => category.as_str(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    /// Parse a chip value. An empty value or the "all" label selects everything.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == ALL_LABEL {
            Ok(Self::All)
        } else {
            Ok(Self::Only(Category::new(s)))
        }
    }
}
