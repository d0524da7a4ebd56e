//! Persisted subsets of store state.
//!
//! Each store persists a snapshot as JSON through [`turbo_cache::Cache`].
//! Serializing a restored snapshot reproduces the saved bytes.

use crate::cart::{Cart, CartStore};
use crate::catalog::{CatalogStore, Product};
use crate::error::CommerceError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use turbo_cache::Cache;

/// Cache key for the catalog snapshot.
pub const CATALOG_KEY: &str = "catalog";

/// Cache key for the cart snapshot.
pub const CART_KEY: &str = "cart";

/// What the catalog store persists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub favorite_ids: Vec<ProductId>,
    pub items_per_page: usize,
}

/// What the cart store persists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CartSnapshot {
    pub cart: Option<Cart>,
}

impl CatalogSnapshot {
    pub fn to_json(&self) -> Result<Vec<u8>, CommerceError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, CommerceError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl CartSnapshot {
    pub fn to_json(&self) -> Result<Vec<u8>, CommerceError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, CommerceError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Write the catalog snapshot under [`CATALOG_KEY`].
pub fn save_catalog(cache: &Cache, store: &CatalogStore) -> Result<(), CommerceError> {
    cache.set_raw(CATALOG_KEY, &store.snapshot().to_json()?)?;
    Ok(())
}

/// Restore the catalog from [`CATALOG_KEY`]. Returns `false` if nothing was
/// saved, leaving the store untouched.
pub fn load_catalog(cache: &Cache, store: &mut CatalogStore) -> Result<bool, CommerceError> {
    match cache.get_raw(CATALOG_KEY)? {
        Some(bytes) => {
            store.restore(CatalogSnapshot::from_json(&bytes)?);
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Write the cart snapshot under [`CART_KEY`].
pub fn save_cart(cache: &Cache, store: &CartStore) -> Result<(), CommerceError> {
    cache.set_raw(CART_KEY, &store.snapshot().to_json()?)?;
    Ok(())
}

/// Restore the cart from [`CART_KEY`]. Returns `false` if nothing was saved.
pub fn load_cart(cache: &Cache, store: &mut CartStore) -> Result<bool, CommerceError> {
    match cache.get_raw(CART_KEY)? {
        Some(bytes) => {
            store.restore(CartSnapshot::from_json(&bytes)?);
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn test_load_without_save() {
        let cache = Cache::in_memory();
        let mut store = CatalogStore::new(&EngineConfig::default());
        assert!(!load_catalog(&cache, &mut store).unwrap());
        let mut cart = CartStore::new(&EngineConfig::default());
        assert!(!load_cart(&cache, &mut cart).unwrap());
    }

    #[test]
    fn test_corrupt_snapshot_is_error() {
        let cache = Cache::in_memory();
        cache.set_raw(CART_KEY, b"{\"cart\": 7}").unwrap();
        let mut store = CartStore::new(&EngineConfig::default());

        let err = load_cart(&cache, &mut store).unwrap_err();
        assert!(matches!(err, CommerceError::Serialization(_)));
        assert!(store.cart().is_none());
    }

    #[test]
    fn test_snapshot_field_names() {
        let store = CatalogStore::new(&EngineConfig::default());
        let json: serde_json::Value =
            serde_json::from_slice(&store.snapshot().to_json().unwrap()).unwrap();
        assert_eq!(json["items_per_page"], 20);
        assert!(json["products"].as_array().unwrap().is_empty());
        assert!(json["favorite_ids"].as_array().unwrap().is_empty());
    }
}
