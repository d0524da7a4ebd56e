//! Catalog file loading.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use turbo_commerce::prelude::*;

/// A catalog file is either a bare product array or a saved snapshot.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Products(Vec<Product>),
    Snapshot(CatalogSnapshot),
}

/// Read a catalog file into a snapshot.
pub fn load_catalog_file(path: &Path) -> Result<CatalogSnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
    parse_catalog(&content)
        .with_context(|| format!("Failed to parse catalog file: {}", path.display()))
}

/// Parse catalog JSON. A product array gets no favorites and the default page size.
pub fn parse_catalog(content: &str) -> Result<CatalogSnapshot> {
    let snapshot = match serde_json::from_str(content)? {
        CatalogFile::Snapshot(snapshot) => snapshot,
        CatalogFile::Products(products) => CatalogSnapshot {
            products,
            favorite_ids: Vec::new(),
            items_per_page: 0,
        },
    };
    Ok(snapshot)
}

/// Build a catalog store from a file, keeping the configured page size for bare arrays.
pub fn load_catalog_store(path: &Path, config: &EngineConfig) -> Result<CatalogStore> {
    let mut snapshot = load_catalog_file(path)?;
    if snapshot.items_per_page == 0 {
        snapshot.items_per_page = config.catalog.items_per_page;
    }

    let mut store = CatalogStore::new(config);
    store.restore(snapshot);
    tracing::debug!(
        path = %path.display(),
        products = store.total_count(),
        "Catalog loaded"
    );
    Ok(store)
}
