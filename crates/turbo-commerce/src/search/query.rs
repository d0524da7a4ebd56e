//! Sort orders.

use serde::{Deserialize, Serialize};

/// Sort options for the catalog view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Price, low to high.
    Price,
    /// Most recently updated first.
    Date,
    /// Favorites first.
    Popularity,
    /// Catalog order.
    #[default]
    None,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Price => "price",
            SortBy::Date => "date",
            SortBy::Popularity => "popularity",
            SortBy::None => "none",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortBy::Price => "Price: Low to High",
            SortBy::Date => "Newest",
            SortBy::Popularity => "Popular",
            SortBy::None => "Featured",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "price" => Some(SortBy::Price),
            "date" => Some(SortBy::Date),
            "popularity" => Some(SortBy::Popularity),
            "none" => Some(SortBy::None),
            _ => None,
        }
    }
}
