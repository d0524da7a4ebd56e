//! Catalog filter state.

use crate::catalog::{Category, Product};
use crate::money::Money;
use crate::search::SortBy;
use serde::{Deserialize, Serialize};

/// Inclusive price bounds.
///
/// Amounts compare in minor units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceRange {
    pub min: Money,
    pub max: Money,
}

impl PriceRange {
    pub fn new(min: Money, max: Money) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: &Money) -> bool {
        price.amount_cents >= self.min.amount_cents && price.amount_cents <= self.max.amount_cents
    }
}

/// What the catalog view is filtered and sorted by.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterState {
    /// Free text; every whitespace-separated term must match.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    #[serde(default)]
    pub sort_by: SortBy,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_price_range(mut self, min: Money, max: Money) -> Self {
        self.price_range = Some(PriceRange::new(min, max));
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Check the category and price filters against `product`.
    pub fn accepts(&self, product: &Product) -> bool {
        if let Some(category) = self.category {
            if product.category != category {
                return false;
            }
        }
        if let Some(range) = &self.price_range {
            if !range.contains(&product.price) {
                return false;
            }
        }
        true
    }

    /// Check if any filter narrows the catalog.
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty() || self.category.is_some() || self.price_range.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_price_range_inclusive() {
        let range = PriceRange::new(Money::new(1_000, Currency::USD), Money::new(2_000, Currency::USD));
        assert!(range.contains(&Money::new(1_000, Currency::USD)));
        assert!(range.contains(&Money::new(2_000, Currency::USD)));
        assert!(!range.contains(&Money::new(2_001, Currency::USD)));
    }

    #[test]
    fn test_default_is_inactive() {
        let filters = FilterState::new();
        assert!(!filters.is_active());
        assert!(filters.with_search("lens").is_active());
    }
}
