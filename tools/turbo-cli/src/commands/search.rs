//! Catalog search command.

use anyhow::{bail, Result};
use serde::Serialize;
use turbo_commerce::prelude::*;

use super::SearchArgs;
use crate::context::Context;
use crate::data::load_catalog_store;
use crate::output::truncate;

#[derive(Serialize)]
struct SearchOutput<'a> {
    items: &'a [Product],
    pagination: &'a Pagination,
}

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let path = ctx.catalog_path(args.catalog.as_deref())?;
    let engine = &ctx.config.engine;
    let mut store = load_catalog_store(&path, engine)?;
    ctx.output
        .debug(&format!("Loaded {} products", store.total_count()));

    apply_args(&mut store, &args, engine.pricing.currency)?;

    let view = store.view();
    if ctx.output.is_json() {
        ctx.output.json(&SearchOutput {
            items: &view.items,
            pagination: &view.pagination,
        });
        return Ok(());
    }

    ctx.output.header(&format!(
        "{} match(es) in {}, sorted by {}",
        view.total_matches(),
        path.display(),
        store.filters().sort_by.display_name()
    ));

    if view.is_empty() {
        ctx.output.info("No products on this page.");
        return Ok(());
    }

    let widths = [16, 36, 12, 12, 3];
    ctx.output
        .table_row(&["ID", "TITLE", "CATEGORY", "PRICE", "FAV"], &widths);
    for product in &view.items {
        let favorite = if store.is_favorite(&product.id) { "★" } else { "" };
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &truncate(&product.title, 36),
                product.category.as_str(),
                &product.price.display(),
                favorite,
            ],
            &widths,
        );
    }

    let pagination = &view.pagination;
    ctx.output.info(&format!(
        "Showing {}-{} of {} (page {}/{})",
        pagination.start_item(),
        pagination.end_item(),
        pagination.total,
        pagination.page,
        pagination.total_pages
    ));
    if pagination.has_next {
        ctx.output
            .info(&format!("Next page: --page {}", pagination.page + 1));
    }

    Ok(())
}

/// Translate arguments into store operations.
fn apply_args(store: &mut CatalogStore, args: &SearchArgs, currency: Currency) -> Result<()> {
    let Some(sort_by) = SortBy::from_str(&args.sort) else {
        bail!(
            "Unknown sort order '{}'. Expected price, date, popularity or none",
            args.sort
        );
    };

    let category = match &args.category {
        Some(name) => match Category::from_str(name) {
            Some(category) => Some(category),
            None => bail!("Unknown category '{}'", name),
        },
        None => None,
    };

    for id in &args.favorite {
        let id = ProductId::new(id.as_str());
        if !store.is_favorite(&id) {
            store.toggle_favorite(&id);
        }
    }

    if let Some(per_page) = args.per_page {
        store.set_items_per_page(per_page);
    }

    store.search_products(args.query.as_str());
    store.filter_by_category(category);
    if args.min.is_some() || args.max.is_some() {
        let min = Money::from_decimal(args.min.unwrap_or(0.0), currency);
        let max = args
            .max
            .map(|max| Money::from_decimal(max, currency))
            .unwrap_or(Money::new(i64::MAX, currency));
        store.filter_by_price_range(min, max);
    }
    store.sort_products(sort_by);

    while store.current_page() < args.page && store.has_next_page() {
        store.load_next_page();
    }

    Ok(())
}
