//! Cart quote command.

use anyhow::{bail, Context as _, Result};
use serde::Serialize;
use turbo_commerce::prelude::*;

use super::QuoteArgs;
use crate::context::Context;
use crate::data::load_catalog_store;
use crate::output::truncate;

#[derive(Serialize)]
struct QuoteOutput<'a> {
    cart: &'a Cart,
    totals: &'a CartTotals,
    warnings: &'a [String],
}

/// Run the quote command.
pub async fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let path = ctx.catalog_path(args.catalog.as_deref())?;
    let engine = &ctx.config.engine;
    let catalog = load_catalog_store(&path, engine)?;

    let lines = args
        .items
        .iter()
        .map(|item| parse_item(item))
        .collect::<Result<Vec<_>>>()?;

    let (store, warnings) = build_cart(&catalog, engine, &lines, &args)?;
    let (Some(cart), Some(totals)) = (store.cart(), store.totals()) else {
        bail!("Cart is empty");
    };

    if ctx.output.is_json() {
        ctx.output.json(&QuoteOutput {
            cart,
            totals,
            warnings: &warnings,
        });
        return Ok(());
    }

    for warning in &warnings {
        ctx.output.warn(warning);
    }

    ctx.output.header("Cart");
    let widths = [16, 30, 5, 12];
    ctx.output.table_row(&["ID", "TITLE", "QTY", "UNIT"], &widths);
    for item in &cart.items {
        let title = catalog
            .get_product(&item.product_id)
            .map(|p| truncate(&p.title, 30))
            .unwrap_or_else(|| "(not in catalog)".to_string());
        let unit = item
            .price_override
            .or_else(|| store.price_book().get(&item.product_id).copied())
            .unwrap_or(Money::zero(cart.currency));
        ctx.output.table_row(
            &[
                item.product_id.as_str(),
                &title,
                &item.quantity.to_string(),
                &unit.display(),
            ],
            &widths,
        );
    }

    if !cart.applied_coupons.is_empty() {
        let codes: Vec<&str> = cart.applied_coupons.iter().map(|c| c.code.as_str()).collect();
        ctx.output.kv("coupons", &codes.join(", "));
    }
    if let Some(option) = &cart.shipping_option {
        let estimate = option
            .delivery_estimate()
            .map(|e| format!(" ({})", e))
            .unwrap_or_default();
        ctx.output.kv("shipping", &format!("{}{}", option.name, estimate));
    }

    ctx.output.header("Totals");
    ctx.output.kv("subtotal", &totals.subtotal.display());
    if totals.has_discounts() {
        ctx.output.kv(
            "discounts",
            &format!(
                "-{} ({:.1}%)",
                totals.discounts.display(),
                totals.discount_percentage()
            ),
        );
    }
    ctx.output.kv(
        &format!("tax ({}%)", engine.pricing.tax_rate_percent),
        &totals.tax.display(),
    );
    ctx.output.kv("shipping", &totals.shipping.display());
    ctx.output.kv("total", &totals.total.display());

    Ok(())
}

/// Parse `ID:QTY`. A bare `ID` means one unit.
fn parse_item(raw: &str) -> Result<(ProductId, u32)> {
    match raw.rsplit_once(':') {
        Some((id, qty)) if !id.is_empty() => {
            let qty = qty
                .parse()
                .with_context(|| format!("Invalid quantity in '{}'", raw))?;
            Ok((ProductId::new(id), qty))
        }
        Some(_) => bail!("Missing product id in '{}'", raw),
        None if raw.is_empty() => bail!("Empty cart line"),
        None => Ok((ProductId::new(raw), 1)),
    }
}

/// Drive a cart store through the requested lines, coupons and shipping.
///
/// Rejected coupons become warnings. Rejected lines fail the quote.
fn build_cart(
    catalog: &CatalogStore,
    engine: &EngineConfig,
    lines: &[(ProductId, u32)],
    args: &QuoteArgs,
) -> Result<(CartStore, Vec<String>)> {
    let mut store = CartStore::new(engine);
    let mut warnings = Vec::new();
    store.set_price_book(catalog.price_book());

    for (id, qty) in lines {
        if catalog.get_product(id).is_none() {
            warnings.push(format!("{} is not in the catalog and is priced at zero", id));
        }
        store.add_item_to_cart(id.clone(), *qty, None);
        if let Some(error) = store.error() {
            bail!("Cannot add {} x{}: {}", id, qty, error);
        }
    }

    for code in &args.coupons {
        store.apply_coupon(code);
        if let Some(error) = store.error() {
            warnings.push(error.to_string());
            store.set_error(None);
        }
    }

    if let Some(id) = &args.shipping {
        let Some(option) = engine.shipping_options.iter().find(|o| &o.id == id) else {
            bail!("Unknown shipping option '{}'", id);
        };
        store.set_shipping_option(Some(option.clone()));
    }

    Ok((store, warnings))
}
