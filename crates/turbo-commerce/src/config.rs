//! Engine configuration.

use crate::cart::{Coupon, ShippingOption};
use crate::error::CommerceError;
use crate::money::Currency;
use serde::{Deserialize, Serialize};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Catalog query settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Cart pricing settings.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Coupons that `apply_coupon` accepts.
    #[serde(default)]
    pub coupons: Vec<Coupon>,

    /// Shipping options offered at checkout.
    #[serde(default)]
    pub shipping_options: Vec<ShippingOption>,
}

impl EngineConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, CommerceError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, CommerceError> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| CommerceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.catalog.items_per_page == 0 {
            return Err(CommerceError::Config(
                "catalog.items_per_page must be at least 1".to_string(),
            ));
        }
        if self.catalog.items_per_page > self.catalog.max_items_per_page {
            return Err(CommerceError::Config(format!(
                "catalog.items_per_page ({}) exceeds catalog.max_items_per_page ({})",
                self.catalog.items_per_page, self.catalog.max_items_per_page
            )));
        }
        if !(0.0..=100.0).contains(&self.pricing.tax_rate_percent) {
            return Err(CommerceError::Config(format!(
                "pricing.tax_rate_percent must be within 0..=100, got {}",
                self.pricing.tax_rate_percent
            )));
        }
        Ok(())
    }
}

/// Catalog query settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// Initial page size.
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,

    /// Upper bound for `set_items_per_page`.
    #[serde(default = "default_max_items_per_page")]
    pub max_items_per_page: usize,

    /// Entries fetched longer ago than this are stale.
    #[serde(default = "default_staleness_window_secs")]
    pub staleness_window_secs: u64,
}

fn default_items_per_page() -> usize {
    20
}

fn default_max_items_per_page() -> usize {
    100
}

fn default_staleness_window_secs() -> u64 {
    300
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            max_items_per_page: default_max_items_per_page(),
            staleness_window_secs: default_staleness_window_secs(),
        }
    }
}

/// Cart pricing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingConfig {
    /// Tax rate applied to the discounted subtotal.
    #[serde(default = "default_tax_rate_percent")]
    pub tax_rate_percent: f64,

    /// Currency carts are priced in.
    #[serde(default)]
    pub currency: Currency,

    /// Lifetime stamped into `Cart::expires_at` on creation.
    #[serde(default = "default_cart_ttl_hours")]
    pub cart_ttl_hours: i64,
}

fn default_tax_rate_percent() -> f64 {
    10.0
}

fn default_cart_ttl_hours() -> i64 {
    24 * 7
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate_percent: default_tax_rate_percent(),
            currency: Currency::default(),
            cart_ttl_hours: default_cart_ttl_hours(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CouponValue;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.catalog.items_per_page, 20);
        assert!((config.pricing.tax_rate_percent - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_toml_coupons_and_shipping() {
        let config = EngineConfig::from_toml_str(
            r#"
            [catalog]
            items_per_page = 12

            [[coupons]]
            code = "SAVE10"
            discount = { type = "percentage", value = 10.0 }

            [[coupons]]
            code = "SHIPFREE"
            discount = { type = "free_shipping" }

            [[shipping_options]]
            id = "standard"
            name = "Standard"
            price = { amount_cents = 500, currency = "USD" }
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.items_per_page, 12);
        assert_eq!(config.catalog.max_items_per_page, 100);
        assert_eq!(config.coupons.len(), 2);
        assert_eq!(config.coupons[0].discount, CouponValue::Percentage(10.0));
        assert_eq!(config.coupons[1].discount, CouponValue::FreeShipping);
        assert_eq!(config.shipping_options[0].price.amount_cents, 500);
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let err = EngineConfig::from_toml_str("[catalog]\nitems_per_page = 0\n").unwrap_err();
        assert!(matches!(err, CommerceError::Config(_)));
    }

    #[test]
    fn test_rejects_out_of_range_tax() {
        let err = EngineConfig::from_json_str(r#"{"pricing": {"tax_rate_percent": 150.0}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("tax_rate_percent"));
    }
}
