//! Catalog store.

use crate::cart::PriceBook;
use crate::catalog::{
    Category, FetchTracker, Product, ProductChange, ProductPatch, ProductSource, SearchIndex,
};
use crate::clock::{Clock, SystemClock};
use crate::config::{CatalogConfig, EngineConfig};
use crate::ids::ProductId;
use crate::money::Money;
use crate::persist::CatalogSnapshot;
use crate::search::{pipeline, CatalogView, FilterState, PriceRange, SortBy};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Product count and average price for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStats {
    pub count: usize,
    /// `None` when the category is empty.
    pub average_price: Option<Money>,
}

/// Owns the product list and everything derived from it.
///
/// Each mutating operation finishes by re-running the pipeline, so
/// [`CatalogStore::view`] always reflects the latest products, filters and
/// page. Unknown ids on update or remove are silently ignored.
pub struct CatalogStore {
    products: Vec<Product>,
    index: SearchIndex,
    favorites: Vec<ProductId>,
    fetches: FetchTracker,
    filters: FilterState,
    page: usize,
    items_per_page: usize,
    max_items_per_page: usize,
    total_count: usize,
    view: CatalogView,
    recompute_count: u64,
    is_loading: bool,
    error: Option<String>,
    clock: Arc<dyn Clock>,
}

impl CatalogStore {
    /// Create an empty store using the wall clock.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an empty store reading time from `clock`.
    pub fn with_clock(config: &EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let CatalogConfig {
            items_per_page,
            max_items_per_page,
            staleness_window_secs,
        } = config.catalog;
        let max_items_per_page = max_items_per_page.max(1);
        let window = Duration::seconds(i64::try_from(staleness_window_secs).unwrap_or(i64::MAX));

        let mut store = Self {
            products: Vec::new(),
            index: SearchIndex::new(),
            favorites: Vec::new(),
            fetches: FetchTracker::new(window),
            filters: FilterState::default(),
            page: 1,
            items_per_page: items_per_page.clamp(1, max_items_per_page),
            max_items_per_page,
            total_count: 0,
            view: CatalogView::default(),
            recompute_count: 0,
            is_loading: false,
            error: None,
            clock,
        };
        store.recompute();
        store
    }

    // Getters

    /// The current page of the filtered, sorted catalog.
    pub fn view(&self) -> &CatalogView {
        &self.view
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get_product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn favorite_ids(&self) -> &[ProductId] {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &ProductId) -> bool {
        self.favorites.contains(id)
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn has_next_page(&self) -> bool {
        self.view.has_next_page()
    }

    /// How many times the pipeline has run.
    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn start_loading(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
        self.is_loading = false;
    }

    // Mutations

    /// Append a product. The caller guarantees the id is new.
    pub fn add_product(&mut self, product: Product) {
        let now = self.clock.now();
        self.index.upsert(&product);
        self.fetches.stamp(&product.id, now);
        self.products.push(product);
        self.total_count += 1;
        self.recompute();
    }

    /// Merge `patch` into a product.
    pub fn update_product(&mut self, id: &ProductId, patch: ProductPatch) {
        if self.patch_one(id, patch) {
            self.recompute();
        }
    }

    pub fn remove_product(&mut self, id: &ProductId) {
        if self.remove_one(id) {
            self.recompute();
        }
    }

    /// Replace the whole catalog.
    pub fn set_products(&mut self, products: Vec<Product>) {
        let now = self.clock.now();
        self.index = SearchIndex::from_products(&products);
        self.fetches.clear();
        for product in &products {
            self.fetches.stamp(&product.id, now);
        }
        self.total_count = products.len();
        self.products = products;
        info!(count = self.total_count, "Replaced catalog");
        self.recompute();
    }

    /// Apply several patches, re-running the pipeline once.
    pub fn batch_update_products(&mut self, changes: Vec<ProductChange>) {
        let mut changed = false;
        for ProductChange { id, patch } in changes {
            changed |= self.patch_one(&id, patch);
        }
        if changed {
            self.recompute();
        }
    }

    /// Remove several products, re-running the pipeline once.
    pub fn batch_remove_products(&mut self, ids: &[ProductId]) {
        let mut changed = false;
        for id in ids {
            changed |= self.remove_one(id);
        }
        if changed {
            self.recompute();
        }
    }

    pub fn toggle_favorite(&mut self, id: &ProductId) {
        match self.favorites.iter().position(|f| f == id) {
            Some(pos) => {
                self.favorites.remove(pos);
            }
            None => self.favorites.push(id.clone()),
        }
        self.recompute();
    }

    // Filters

    pub fn search_products(&mut self, query: impl Into<String>) {
        self.filters.search = query.into();
        self.refilter();
    }

    pub fn filter_by_category(&mut self, category: Option<Category>) {
        self.filters.category = category;
        self.refilter();
    }

    /// Keep prices within `[min, max]`.
    pub fn filter_by_price_range(&mut self, min: Money, max: Money) {
        self.filters.price_range = Some(PriceRange::new(min, max));
        self.refilter();
    }

    pub fn clear_price_range(&mut self) {
        self.filters.price_range = None;
        self.refilter();
    }

    pub fn sort_products(&mut self, sort_by: SortBy) {
        self.filters.sort_by = sort_by;
        self.refilter();
    }

    pub fn reset_filters(&mut self) {
        self.filters = FilterState::default();
        self.refilter();
    }

    // Pagination

    /// Advance one page. Does nothing on the last page.
    pub fn load_next_page(&mut self) {
        if self.view.has_next_page() {
            self.page += 1;
            self.recompute();
        }
    }

    /// Change the page size, clamped to `1..=max_items_per_page`, and go back
    /// to page 1.
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.clamp(1, self.max_items_per_page);
        self.page = 1;
        self.recompute();
    }

    // Staleness

    /// Clear one fetch stamp, or all of them.
    pub fn invalidate_cache(&mut self, id: Option<&ProductId>) {
        self.fetches.invalidate(id);
    }

    pub fn last_fetched(&self, id: &ProductId) -> Option<DateTime<Utc>> {
        self.fetches.last_fetched(id)
    }

    pub fn is_stale(&self, id: &ProductId) -> bool {
        self.fetches.is_stale(id, self.clock.now())
    }

    /// Ids of stale products, in catalog order.
    pub fn stale_product_ids(&self) -> Vec<ProductId> {
        let now = self.clock.now();
        self.products
            .iter()
            .filter(|p| self.fetches.is_stale(&p.id, now))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Re-fetch one product from `source` and write it back.
    ///
    /// On failure the error is recorded and the product is left as is. A
    /// product removed while the fetch was in flight is not re-added.
    #[instrument(skip_all, fields(product_id = %id))]
    pub async fn refresh_product(&mut self, source: &dyn ProductSource, id: &ProductId) {
        self.start_loading();
        let result = source.fetch_product(id).await;
        self.stop_loading();

        match result {
            Ok(mut fresh) => {
                let now = self.clock.now();
                let Some(slot) = self.products.iter_mut().find(|p| &p.id == id) else {
                    debug!("Product removed before refresh completed");
                    return;
                };
                fresh.id = id.clone();
                *slot = fresh;
                self.index.upsert(slot);
                self.fetches.stamp(id, now);
                self.recompute();
            }
            Err(e) => {
                error!(error = %e, "Product refresh failed");
                self.error = Some(e.to_string());
            }
        }
    }

    // Derived data

    /// Count and average price of one category.
    pub fn category_stats(&self, category: Category) -> CategoryStats {
        let prices: Vec<&Money> = self
            .products
            .iter()
            .filter(|p| p.category == category)
            .map(|p| &p.price)
            .collect();

        let average_price = prices.first().map(|first| {
            let total: i64 = prices.iter().map(|m| m.amount_cents).sum();
            let average = (total as f64 / prices.len() as f64).round() as i64;
            Money::new(average, first.currency)
        });

        CategoryStats {
            count: prices.len(),
            average_price,
        }
    }

    /// Unit prices for the cart to resolve against.
    pub fn price_book(&self) -> PriceBook {
        self.products
            .iter()
            .map(|p| (p.id.clone(), p.price))
            .collect()
    }

    // Persistence

    /// The persisted subset of this store.
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            products: self.products.clone(),
            favorite_ids: self.favorites.clone(),
            items_per_page: self.items_per_page,
        }
    }

    /// Load a snapshot, rebuilding the index and fetch stamps.
    ///
    /// Filters reset and the view returns to page 1. Entries are not
    /// revalidated.
    pub fn restore(&mut self, snapshot: CatalogSnapshot) {
        let CatalogSnapshot {
            products,
            favorite_ids,
            items_per_page,
        } = snapshot;
        let now = self.clock.now();

        self.index = SearchIndex::from_products(&products);
        self.fetches.clear();
        for product in &products {
            self.fetches.stamp(&product.id, now);
        }
        self.total_count = products.len();
        self.products = products;
        self.favorites = favorite_ids;
        self.items_per_page = items_per_page.clamp(1, self.max_items_per_page);
        if self.items_per_page != items_per_page {
            warn!(
                saved = items_per_page,
                applied = self.items_per_page,
                "Clamped restored page size"
            );
        }
        self.filters = FilterState::default();
        self.page = 1;
        self.error = None;
        info!(count = self.total_count, "Restored catalog");
        self.recompute();
    }

    // Internals

    /// Patch one product without recomputing. Returns whether it existed.
    fn patch_one(&mut self, id: &ProductId, patch: ProductPatch) -> bool {
        let now = self.clock.now();
        let Some(product) = self.products.iter_mut().find(|p| &p.id == id) else {
            return false;
        };
        if !product.apply_patch(patch, now) {
            warn!(
                product_id = %id,
                kind = product.details.kind(),
                "Ignored details of a different product type"
            );
        }
        self.index.upsert(product);
        self.fetches.stamp(id, now);
        true
    }

    /// Remove one product without recomputing. Returns whether it existed.
    fn remove_one(&mut self, id: &ProductId) -> bool {
        let Some(pos) = self.products.iter().position(|p| &p.id == id) else {
            return false;
        };
        self.products.remove(pos);
        self.index.remove(id);
        self.fetches.forget(id);
        self.total_count -= 1;
        true
    }

    fn refilter(&mut self) {
        self.page = 1;
        self.recompute();
    }

    fn recompute(&mut self) {
        let started = Instant::now();
        let favorites: HashSet<ProductId> = self.favorites.iter().cloned().collect();
        self.view = pipeline::run(
            &self.products,
            &self.index,
            &self.filters,
            &favorites,
            self.page,
            self.items_per_page,
        );
        self.recompute_count += 1;
        debug!(
            matches = self.view.total_matches(),
            page = self.page,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Recomputed catalog view"
        );
    }
}
