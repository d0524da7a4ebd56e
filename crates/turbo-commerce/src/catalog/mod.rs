//! Product catalog module.
//!
//! Contains the product model, the search index, fetch-time tracking, the
//! remote source seam, and the catalog store.

mod index;
mod product;
mod source;
mod staleness;
mod store;

pub use index::{build_tokens, query_terms, SearchIndex};
pub use product::{
    Category, Condition, DigitalDetails, LicenseType, PhysicalDetails, Product, ProductChange,
    ProductDetails, ProductPatch,
};
pub use source::ProductSource;
pub use staleness::FetchTracker;
pub use store::{CatalogStore, CategoryStats};
