//! Cart pricing calculations.

use crate::cart::{Cart, CouponValue};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unit prices the cart resolves items against, keyed by product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceBook {
    prices: HashMap<ProductId, Money>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, product_id: ProductId, price: Money) {
        self.prices.insert(product_id, price);
    }

    pub fn with_price(mut self, product_id: impl Into<ProductId>, price: Money) -> Self {
        self.insert(product_id.into(), price);
        self
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&Money> {
        self.prices.get(product_id)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<(ProductId, Money)> for PriceBook {
    fn from_iter<I: IntoIterator<Item = (ProductId, Money)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

/// Derived money fields of a cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of quantity x unit price.
    pub subtotal: Money,
    /// Sum of coupon discounts, each taken from the undiscounted subtotal.
    pub discounts: Money,
    /// Tax on (subtotal - discounts).
    pub tax: Money,
    /// Selected shipping price.
    pub shipping: Money,
    /// subtotal - discounts + tax + shipping.
    pub total: Money,
}

impl CartTotals {
    /// All-zero totals.
    pub fn zero(currency: Currency) -> Self {
        Self {
            subtotal: Money::zero(currency),
            discounts: Money::zero(currency),
            tax: Money::zero(currency),
            shipping: Money::zero(currency),
            total: Money::zero(currency),
        }
    }

    /// Check if any discounts are applied.
    pub fn has_discounts(&self) -> bool {
        self.discounts.amount_cents > 0
    }

    /// Get discount percentage of subtotal.
    pub fn discount_percentage(&self) -> f64 {
        if self.subtotal.amount_cents == 0 {
            return 0.0;
        }
        (self.discounts.amount_cents as f64 / self.subtotal.amount_cents as f64) * 100.0
    }
}

impl Default for CartTotals {
    fn default() -> Self {
        Self::zero(Currency::default())
    }
}

/// Resolve the unit price of one line: override, then price book, then zero.
fn unit_price(
    product_id: &ProductId,
    price_override: Option<&Money>,
    prices: &PriceBook,
    currency: Currency,
) -> Result<Money, CommerceError> {
    let price = match price_override.or_else(|| prices.get(product_id)) {
        Some(price) => *price,
        None => return Ok(Money::zero(currency)),
    };
    if price.currency != currency {
        return Err(CommerceError::CurrencyMismatch {
            expected: currency.code().to_string(),
            got: price.currency.code().to_string(),
        });
    }
    Ok(price)
}

/// Compute a cart's totals.
///
/// Pure: the same cart, prices and rate always give the same result. Returns
/// an error on currency mismatch or overflow.
pub fn calculate_totals(
    cart: &Cart,
    prices: &PriceBook,
    tax_rate_percent: f64,
) -> Result<CartTotals, CommerceError> {
    let currency = cart.currency;

    let mut subtotal = Money::zero(currency);
    for item in &cart.items {
        let line = unit_price(&item.product_id, item.price_override.as_ref(), prices, currency)?
            .try_multiply(i64::from(item.quantity))
            .ok_or(CommerceError::Overflow)?;
        subtotal = subtotal.try_add(&line).ok_or(CommerceError::Overflow)?;
    }

    // Percentages are summed unrounded and rounded once.
    let mut percent = 0.0;
    let mut amounts = Vec::new();
    for coupon in &cart.applied_coupons {
        match &coupon.discount {
            CouponValue::Percentage(p) => percent += *p,
            CouponValue::Fixed(amount) if amount.currency != currency => {
                return Err(CommerceError::CurrencyMismatch {
                    expected: currency.code().to_string(),
                    got: amount.currency.code().to_string(),
                })
            }
            other => amounts.push(other.calculate(&subtotal)),
        }
    }
    let discounts = Money::try_sum(amounts.iter(), currency)
        .and_then(|fixed| fixed.try_add(&subtotal.percentage(percent)))
        .ok_or(CommerceError::Overflow)?;

    let shipping = match &cart.shipping_option {
        Some(option) if option.price.currency != currency => {
            return Err(CommerceError::CurrencyMismatch {
                expected: currency.code().to_string(),
                got: option.price.currency.code().to_string(),
            })
        }
        Some(option) => option.price,
        None => Money::zero(currency),
    };

    let taxable = subtotal
        .try_subtract(&discounts)
        .ok_or(CommerceError::Overflow)?;
    let tax = taxable.percentage(tax_rate_percent);

    let total = [taxable, tax, shipping]
        .iter()
        .try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
        .ok_or(CommerceError::Overflow)?;

    Ok(CartTotals {
        subtotal,
        discounts,
        tax,
        shipping,
        total,
    })
}
