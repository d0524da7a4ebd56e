//! Shipping option types.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A shipping option with a flat price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingOption {
    /// Unique identifier (e.g., "standard").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Flat shipping price.
    pub price: Money,
    /// Minimum delivery days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_delivery_days: Option<u32>,
    /// Maximum delivery days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_delivery_days: Option<u32>,
}

impl ShippingOption {
    /// Create a new shipping option.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            min_delivery_days: None,
            max_delivery_days: None,
        }
    }

    /// Set the delivery window.
    pub fn with_delivery_days(mut self, min: u32, max: u32) -> Self {
        self.min_delivery_days = Some(min);
        self.max_delivery_days = Some(max);
        self
    }

    /// Get delivery estimate string.
    pub fn delivery_estimate(&self) -> Option<String> {
        match (self.min_delivery_days, self.max_delivery_days) {
            (Some(min), Some(max)) if min == max => Some(format!("{} days", min)),
            (Some(min), Some(max)) => Some(format!("{}-{} days", min, max)),
            (Some(min), None) => Some(format!("{}+ days", min)),
            (None, Some(max)) => Some(format!("Up to {} days", max)),
            (None, None) => None,
        }
    }

    /// Check if this option costs nothing.
    pub fn is_free(&self) -> bool {
        self.price.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_delivery_estimate() {
        let option = ShippingOption::new("express", "Express", Money::new(1500, Currency::USD))
            .with_delivery_days(1, 2);
        assert_eq!(option.delivery_estimate().as_deref(), Some("1-2 days"));
        assert!(!option.is_free());
    }

    #[test]
    fn test_estimate_absent_without_window() {
        let option = ShippingOption::new("pickup", "Store pickup", Money::zero(Currency::USD));
        assert_eq!(option.delivery_estimate(), None);
        assert!(option.is_free());
    }
}
