//! Search module.
//!
//! Contains the filter state, sort orders, pagination, and the pipeline that
//! turns the catalog into a paginated view.

mod filter;
pub mod pipeline;
mod query;
mod results;

pub use filter::{FilterState, PriceRange};
pub use query::SortBy;
pub use results::{CatalogView, Pagination};
