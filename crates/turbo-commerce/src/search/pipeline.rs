//! The filter, sort, paginate pipeline.
//!
//! Pure functions of their inputs. The catalog store calls [`run`] after every
//! mutation and filter change.

use crate::catalog::{query_terms, Product, SearchIndex};
use crate::ids::ProductId;
use crate::search::{CatalogView, FilterState, Pagination, SortBy};
use std::collections::HashSet;

/// Filter and sort `products`, keeping every match.
///
/// Steps run in order: text, category, price, then a stable sort. Running this
/// again on its own output with the same inputs yields the same sequence.
pub fn filter_and_sort<'a>(
    products: &'a [Product],
    index: &SearchIndex,
    filters: &FilterState,
    favorites: &HashSet<ProductId>,
) -> Vec<&'a Product> {
    let terms = query_terms(&filters.search);

    let mut matches: Vec<&Product> = products
        .iter()
        .filter(|p| index.matches(&p.id, &terms))
        .filter(|p| filters.accepts(p))
        .collect();

    match filters.sort_by {
        SortBy::Price => matches.sort_by_key(|p| p.price.amount_cents),
        SortBy::Date => matches.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortBy::Popularity => matches.sort_by_key(|p| !favorites.contains(&p.id)),
        SortBy::None => {}
    }

    matches
}

/// Slice one page out of the full match list.
pub fn paginate(matches: &[&Product], page: usize, per_page: usize) -> CatalogView {
    let pagination = Pagination::new(page, per_page, matches.len());
    let start = pagination.offset().min(matches.len());
    let end = pagination.end().min(matches.len());

    CatalogView {
        items: matches[start..end].iter().map(|p| (*p).clone()).collect(),
        pagination,
    }
}

/// Run the whole pipeline.
pub fn run(
    products: &[Product],
    index: &SearchIndex,
    filters: &FilterState,
    favorites: &HashSet<ProductId>,
    page: usize,
    per_page: usize,
) -> CatalogView {
    let matches = filter_and_sort(products, index, filters, favorites);
    paginate(&matches, page, per_page)
}
