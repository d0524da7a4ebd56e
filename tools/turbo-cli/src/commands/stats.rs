//! Category statistics command.

use anyhow::Result;
use serde::Serialize;
use turbo_commerce::prelude::*;

use super::StatsArgs;
use crate::context::Context;
use crate::data::load_catalog_store;

#[derive(Debug, Serialize, PartialEq)]
struct CategoryRow {
    category: Category,
    count: usize,
    average_price: Option<Money>,
}

/// Run the stats command.
pub async fn run(args: StatsArgs, ctx: &Context) -> Result<()> {
    let path = ctx.catalog_path(args.catalog.as_deref())?;
    let store = load_catalog_store(&path, &ctx.config.engine)?;
    let rows = collect_rows(&store, args.all);

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output
        .header(&format!("{} products in {}", store.total_count(), path.display()));

    let widths = [12, 6, 12];
    ctx.output.table_row(&["CATEGORY", "COUNT", "AVG PRICE"], &widths);
    for row in &rows {
        let average = row
            .average_price
            .map(|m| m.display())
            .unwrap_or_else(|| "-".to_string());
        ctx.output.table_row(
            &[row.category.as_str(), &row.count.to_string(), &average],
            &widths,
        );
    }

    Ok(())
}

fn collect_rows(store: &CatalogStore, include_empty: bool) -> Vec<CategoryRow> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let stats = store.category_stats(category);
            CategoryRow {
                category,
                count: stats.count,
                average_price: stats.average_price,
            }
        })
        .filter(|row| include_empty || row.count > 0)
        .collect()
}
