//! Cart and cart item types.

use crate::cart::{CartTotals, Coupon, ShippingOption};
use crate::error::CommerceError;
use crate::ids::{CartId, ProductId, UserId};
use crate::money::{Currency, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum quantity allowed per cart line.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// Free-form per-line options (e.g., "size" -> "L").
pub type ItemOptions = BTreeMap<String, serde_json::Value>;

/// A shopping cart.
///
/// Totals are derived. Only the cart store writes them, after every
/// mutation that can change them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    /// Owner, when the cart belongs to a signed-in user.
    pub owner: Option<UserId>,
    /// Cart currency.
    pub currency: Currency,
    /// Lines, at most one per product.
    pub items: Vec<CartItem>,
    /// Applied coupons, unique by code.
    pub applied_coupons: Vec<Coupon>,
    /// Selected shipping option.
    pub shipping_option: Option<ShippingOption>,
    /// Derived totals.
    #[serde(flatten)]
    pub totals: CartTotals,
    pub gift_message: Option<String>,
    pub gift_wrap: bool,
    /// Stored only; pricing does not consult it.
    pub price_lock_until: Option<DateTime<Utc>>,
    /// Stored only; nothing expires the cart automatically.
    pub expires_at: DateTime<Utc>,
    /// Bumped on every mutation.
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Create an empty cart that expires `ttl` after `now`.
    pub fn new(
        owner: Option<UserId>,
        currency: Currency,
        now: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            id: CartId::generate(),
            owner,
            currency,
            items: Vec::new(),
            applied_coupons: Vec::new(),
            shipping_option: None,
            totals: CartTotals::zero(currency),
            gift_message: None,
            gift_wrap: false,
            price_lock_until: None,
            expires_at: now + ttl,
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a product to the cart.
    ///
    /// An existing line for the same product absorbs the quantity and has
    /// `options` merged over its own. Returns an error if:
    /// - Quantity is zero
    /// - The line would exceed MAX_QUANTITY_PER_ITEM
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        options: ItemOptions,
        now: DateTime<Utc>,
    ) -> Result<(), CommerceError> {
        if quantity == 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;

            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }

            existing.quantity = new_quantity;
            existing.options.extend(options);
            return Ok(());
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        self.items
            .push(CartItem::new(product_id, quantity, now).with_options(options));
        Ok(())
    }

    /// Replace a line's quantity. Zero removes the line.
    ///
    /// Returns whether a line matched.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<bool, CommerceError> {
        if quantity == 0 {
            return Ok(self.remove_item(product_id));
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        match self.items.iter_mut().find(|i| &i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replace a line's options wholesale.
    pub fn update_options(&mut self, product_id: &ProductId, options: ItemOptions) -> bool {
        match self.items.iter_mut().find(|i| &i.product_id == product_id) {
            Some(item) => {
                item.options = options;
                true
            }
            None => false,
        }
    }

    /// Set or clear a line's price override.
    pub fn set_price_override(&mut self, product_id: &ProductId, price: Option<Money>) -> bool {
        match self.items.iter_mut().find(|i| &i.product_id == product_id) {
            Some(item) => {
                item.price_override = price;
                true
            }
            None => false,
        }
    }

    /// Remove a line.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        self.items.len() < len_before
    }

    /// Append a coupon. Re-applying a code stacks another copy.
    pub fn apply_coupon(&mut self, coupon: Coupon) {
        self.applied_coupons.push(coupon);
    }

    /// Remove every applied coupon with this code.
    pub fn remove_coupon(&mut self, code: &str) -> bool {
        let len_before = self.applied_coupons.len();
        self.applied_coupons.retain(|c| !c.matches_code(code));
        self.applied_coupons.len() < len_before
    }

    pub fn has_coupon(&self, code: &str) -> bool {
        self.applied_coupons.iter().any(|c| c.matches_code(code))
    }

    /// Record a mutation.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.revision += 1;
        self.updated_at = now;
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a line by product.
    pub fn get_item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }
}

/// One line of a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub product_id: ProductId,
    /// Always within 1..=MAX_QUANTITY_PER_ITEM.
    pub quantity: u32,
    #[serde(default)]
    pub options: ItemOptions,
    /// Takes precedence over the catalog price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_override: Option<Money>,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn new(product_id: ProductId, quantity: u32, added_at: DateTime<Utc>) -> Self {
        Self {
            product_id,
            quantity,
            options: ItemOptions::new(),
            price_override: None,
            added_at,
        }
    }

    pub fn with_options(mut self, options: ItemOptions) -> Self {
        self.options = options;
        self
    }
}
