//! Coupon types.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Type of coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponType {
    /// Percentage off the subtotal.
    Percentage,
    /// Fixed amount off.
    Fixed,
    /// Free shipping.
    FreeShipping,
}

impl CouponType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponType::Percentage => "percentage",
            CouponType::Fixed => "fixed",
            CouponType::FreeShipping => "free_shipping",
        }
    }
}

/// Value of a coupon, tagged by its type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CouponValue {
    /// Percentage off (0.0 - 100.0).
    Percentage(f64),
    /// Fixed amount off.
    Fixed(Money),
    /// Free shipping.
    FreeShipping,
}

impl CouponValue {
    /// Discount this value contributes against `subtotal`.
    ///
    /// Always computed from the undiscounted subtotal; coupons never compound.
    /// Fixed amounts are taken as-is in their own currency, even past the
    /// subtotal. Free shipping contributes nothing to the discount line.
    pub fn calculate(&self, subtotal: &Money) -> Money {
        match self {
            CouponValue::Percentage(percent) => subtotal.percentage(*percent),
            CouponValue::Fixed(amount) => *amount,
            CouponValue::FreeShipping => Money::zero(subtotal.currency),
        }
    }

    pub fn coupon_type(&self) -> CouponType {
        match self {
            CouponValue::Percentage(_) => CouponType::Percentage,
            CouponValue::Fixed(_) => CouponType::Fixed,
            CouponValue::FreeShipping => CouponType::FreeShipping,
        }
    }
}

/// A coupon the cart can apply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    /// Coupon code (e.g., "SAVE10").
    pub code: String,
    /// What the coupon takes off.
    pub discount: CouponValue,
}

impl Coupon {
    /// Create a percentage coupon.
    pub fn percentage(code: impl Into<String>, percent: f64) -> Self {
        Self {
            code: code.into(),
            discount: CouponValue::Percentage(percent),
        }
    }

    /// Create a fixed amount coupon.
    pub fn fixed(code: impl Into<String>, amount: Money) -> Self {
        Self {
            code: code.into(),
            discount: CouponValue::Fixed(amount),
        }
    }

    /// Create a free shipping coupon.
    pub fn free_shipping(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            discount: CouponValue::FreeShipping,
        }
    }

    pub fn coupon_type(&self) -> CouponType {
        self.discount.coupon_type()
    }

    /// Codes compare case-insensitively.
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code.trim())
    }

    /// Discount against `subtotal`.
    pub fn calculate(&self, subtotal: &Money) -> Money {
        self.discount.calculate(subtotal)
    }
}
