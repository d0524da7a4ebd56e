//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let engine = &ctx.config.engine;

    ctx.output.header("[data]");
    ctx.output.kv(
        "catalog",
        ctx.config.data.catalog.as_deref().unwrap_or("(none)"),
    );

    ctx.output.header("[engine.catalog]");
    ctx.output
        .kv("items_per_page", &engine.catalog.items_per_page.to_string());
    ctx.output.kv(
        "max_items_per_page",
        &engine.catalog.max_items_per_page.to_string(),
    );
    ctx.output.kv(
        "staleness_window_secs",
        &engine.catalog.staleness_window_secs.to_string(),
    );

    ctx.output.header("[engine.pricing]");
    ctx.output
        .kv("tax_rate_percent", &engine.pricing.tax_rate_percent.to_string());
    ctx.output.kv("currency", engine.pricing.currency.code());
    ctx.output
        .kv("cart_ttl_hours", &engine.pricing.cart_ttl_hours.to_string());

    if !engine.coupons.is_empty() {
        ctx.output.header("Coupons");
        for coupon in &engine.coupons {
            ctx.output.list_item(&format!(
                "{} ({})",
                coupon.code,
                coupon.coupon_type().as_str()
            ));
        }
    }

    if !engine.shipping_options.is_empty() {
        ctx.output.header("Shipping options");
        for option in &engine.shipping_options {
            ctx.output.list_item(&format!(
                "{}: {} {}",
                option.id,
                option.name,
                option.price.display()
            ));
        }
    }

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("turbo.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let warnings = lint(&ctx.config);

    if let Some(path) = &ctx.config_path {
        ctx.output.info(&format!("Checked {}", path.display()));
    } else {
        ctx.output.info("No config file found, checking defaults");
    }

    if warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Problems that load but probably are not intended. Hard errors are
/// rejected while loading.
fn lint(config: &CliConfig) -> Vec<String> {
    let engine = &config.engine;
    let mut warnings = Vec::new();

    for (i, coupon) in engine.coupons.iter().enumerate() {
        if coupon.code.trim().is_empty() {
            warnings.push(format!("engine.coupons[{}].code is empty", i));
        }
        let duplicate = engine.coupons[..i]
            .iter()
            .any(|earlier| earlier.matches_code(&coupon.code));
        if duplicate {
            warnings.push(format!(
                "engine.coupons[{}] repeats code '{}'; only the first is used",
                i, coupon.code
            ));
        }
    }

    for (i, option) in engine.shipping_options.iter().enumerate() {
        if option.price.currency != engine.pricing.currency {
            warnings.push(format!(
                "engine.shipping_options[{}] is priced in {} but carts use {}",
                i,
                option.price.currency.code(),
                engine.pricing.currency.code()
            ));
        }
    }

    if config.data.catalog.is_none() {
        warnings.push("data.catalog is not set; commands need --catalog".to_string());
    }

    warnings
}
