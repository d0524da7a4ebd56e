//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use turbo_commerce::EngineConfig;

/// Config file names searched for, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["turbo.toml", ".turbo.toml", "turbo.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Engine settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Default data files.
    #[serde(default)]
    pub data: DataConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    /// Parse config text, choosing the format from the file name.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        let config: Self = if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))?
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))?
        };

        config
            .engine
            .validate()
            .with_context(|| format!("Invalid engine settings in {}", path))?;
        Ok(config)
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }
}

/// Default data files used when a command is not given one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Catalog JSON: a product array or a saved catalog snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
}

/// Generate the starter config written by `turbo config init`.
pub fn generate_default_config() -> String {
    r#"# TurboCommerce CLI configuration

[data]
# catalog = "catalog.json"

[engine.catalog]
items_per_page = 20
max_items_per_page = 100
staleness_window_secs = 300

[engine.pricing]
tax_rate_percent = 10.0
currency = "USD"
cart_ttl_hours = 168

[[engine.coupons]]
code = "WELCOME10"
discount = { type = "percentage", value = 10.0 }

[[engine.coupons]]
code = "FREESHIP"
discount = { type = "free_shipping" }

[[engine.shipping_options]]
id = "standard"
name = "Standard"
price = { amount_cents = 599, currency = "USD" }
min_delivery_days = 3
max_delivery_days = 5

[[engine.shipping_options]]
id = "express"
name = "Express"
price = { amount_cents = 1499, currency = "USD" }
min_delivery_days = 1
max_delivery_days = 2
"#
    .to_string()
}
