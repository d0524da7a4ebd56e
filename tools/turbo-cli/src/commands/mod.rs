//! CLI command implementations.

pub mod config;
pub mod quote;
pub mod search;
pub mod stats;

use clap::{Args, Subcommand};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search text; every term must match.
    #[arg(default_value = "")]
    pub query: String,

    /// Catalog file (default: data.catalog from config).
    #[arg(long)]
    pub catalog: Option<String>,

    /// Only show this category.
    #[arg(long)]
    pub category: Option<String>,

    /// Minimum price, in major units.
    #[arg(long)]
    pub min: Option<f64>,

    /// Maximum price, in major units.
    #[arg(long)]
    pub max: Option<f64>,

    /// Sort order: price, date, popularity or none.
    #[arg(short, long, default_value = "none")]
    pub sort: String,

    /// Page to show.
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Items per page (default: catalog.items_per_page from config).
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Mark a product as favorite before sorting. Repeatable.
    #[arg(long)]
    pub favorite: Vec<String>,
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Cart line as PRODUCT_ID:QUANTITY. Repeatable.
    #[arg(short, long = "item", required = true)]
    pub items: Vec<String>,

    /// Coupon code to apply. Repeatable.
    #[arg(long = "coupon")]
    pub coupons: Vec<String>,

    /// Shipping option id from config.
    #[arg(long)]
    pub shipping: Option<String>,

    /// Catalog file (default: data.catalog from config).
    #[arg(long)]
    pub catalog: Option<String>,
}

/// Arguments for the stats command.
#[derive(Args)]
pub struct StatsArgs {
    /// Catalog file (default: data.catalog from config).
    #[arg(long)]
    pub catalog: Option<String>,

    /// Include categories with no products.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Create a starter turbo.toml.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate configuration.
    Validate,
}
