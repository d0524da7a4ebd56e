//! Per-product search tokens.

use crate::catalog::Product;
use crate::ids::ProductId;
use std::collections::{HashMap, HashSet};

/// Build the token list for one product.
///
/// Tokens are the whitespace-separated, lowercased words of the title,
/// description, category, tags, variant text fields, and string metadata
/// values, in that order, without repeats.
pub fn build_tokens(product: &Product) -> Vec<String> {
    let mut sources: Vec<&str> = vec![
        product.title.as_str(),
        product.description.as_str(),
        product.category.as_str(),
    ];
    sources.extend(product.tags.iter().map(String::as_str));
    sources.extend(product.details.text_fields());
    sources.extend(product.metadata.values().filter_map(|v| v.as_str()));

    let mut seen = HashSet::new();
    sources
        .into_iter()
        .flat_map(str::split_whitespace)
        .map(str::to_lowercase)
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// Split a free-text query into lowercase terms.
pub fn query_terms(search: &str) -> Vec<String> {
    search.split_whitespace().map(str::to_lowercase).collect()
}

/// Token lists keyed by product id.
///
/// Entries are only ever replaced whole, never edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchIndex {
    entries: HashMap<ProductId, Vec<String>>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index covering `products`.
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        Self {
            entries: products
                .into_iter()
                .map(|p| (p.id.clone(), build_tokens(p)))
                .collect(),
        }
    }

    /// Rebuild the entry for `product`.
    pub fn upsert(&mut self, product: &Product) {
        self.entries.insert(product.id.clone(), build_tokens(product));
    }

    pub fn remove(&mut self, id: &ProductId) -> Option<Vec<String>> {
        self.entries.remove(id)
    }

    pub fn tokens(&self, id: &ProductId) -> Option<&[String]> {
        self.entries.get(id).map(Vec::as_slice)
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every term is a substring of some token of `id`.
    ///
    /// No terms matches everything; an unindexed id matches nothing else.
    pub fn matches(&self, id: &ProductId, terms: &[String]) -> bool {
        if terms.is_empty() {
            return true;
        }
        match self.entries.get(id) {
            Some(tokens) => terms
                .iter()
                .all(|term| tokens.iter().any(|token| token.contains(term.as_str()))),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, DigitalDetails, PhysicalDetails, ProductDetails};
    use crate::money::{Currency, Money};
    use serde_json::json;

    fn lens() -> Product {
        let mut details = PhysicalDetails::new("Sigma", "Art 35mm");
        details.specifications.insert("Mount".to_string(), "Sony E".to_string());
        Product::new(
            "lens-1",
            "Prime Lens",
            Category::Lenses,
            Money::new(89_900, Currency::USD),
            ProductDetails::Physical(details),
        )
        .with_description("Fast prime for low light")
        .with_tag("Portrait")
        .with_metadata("origin", json!("Japan"))
        .with_metadata("weight", json!(640))
    }

    #[test]
    fn test_tokens_cover_all_text_fields() {
        let tokens = build_tokens(&lens());
        for expected in ["prime", "lens", "low", "lenses", "portrait", "sigma", "35mm", "sony", "japan"] {
            assert!(tokens.iter().any(|t| t == expected), "missing {expected}");
        }
        assert!(!tokens.iter().any(|t| t == "640"));
    }

    #[test]
    fn test_tokens_are_lowercase_and_unique() {
        let tokens = build_tokens(&lens());
        assert!(tokens.iter().all(|t| t.chars().all(|c| !c.is_uppercase())));
        assert_eq!(tokens.iter().filter(|t| *t == "prime").count(), 1);
        assert_eq!(tokens[0], "prime");
    }

    #[test]
    fn test_digital_fields_indexed() {
        let mut details = DigitalDetails::new("cube", "2.1");
        details.compatibility.push("DaVinci Resolve".to_string());
        let product = Product::new(
            "lut-1",
            "Teal Orange",
            Category::Luts,
            Money::new(1_900, Currency::USD),
            ProductDetails::Digital(details),
        );
        let tokens = build_tokens(&product);
        assert!(tokens.contains(&"resolve".to_string()));
        assert!(tokens.contains(&"cube".to_string()));
    }

    #[test]
    fn test_matches_requires_every_term() {
        let product = lens();
        let index = SearchIndex::from_products([&product]);

        assert!(index.matches(&product.id, &query_terms("PRIME sig")));
        assert!(!index.matches(&product.id, &query_terms("prime canon")));
        assert!(index.matches(&product.id, &[]));
        assert!(!index.matches(&ProductId::new("other"), &query_terms("prime")));
    }

    #[test]
    fn test_upsert_replaces_entry() {
        let mut product = lens();
        let mut index = SearchIndex::from_products([&product]);
        product.title = "Zoom Lens".to_string();
        product.description = "Versatile telephoto range".to_string();
        index.upsert(&product);

        assert!(!index.matches(&product.id, &query_terms("prime")));
        assert!(index.matches(&product.id, &query_terms("zoom")));
        assert_eq!(index.len(), 1);
    }
}
