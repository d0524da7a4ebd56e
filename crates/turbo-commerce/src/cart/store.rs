//! Cart store.

use crate::cart::{calculate_totals, Cart, CartTotals, Coupon, ItemOptions, PriceBook, ShippingOption};
use crate::clock::{Clock, SystemClock};
use crate::config::{EngineConfig, PricingConfig};
use crate::error::CommerceError;
use crate::ids::{ProductId, UserId};
use crate::money::Money;
use crate::persist::CartSnapshot;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns the cart and keeps its totals consistent.
///
/// The cart is created on the first successful add and dropped when its last
/// line goes. Every mutation is staged on a copy, priced, and only then
/// committed, so a rejected operation leaves the previous cart untouched and
/// reports through [`CartStore::error`].
pub struct CartStore {
    cart: Option<Cart>,
    available_coupons: Vec<Coupon>,
    prices: PriceBook,
    owner: Option<UserId>,
    pricing: PricingConfig,
    is_loading: bool,
    error: Option<String>,
    clock: Arc<dyn Clock>,
}

impl CartStore {
    /// Create a store using the wall clock.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a store reading time from `clock`.
    pub fn with_clock(config: &EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            cart: None,
            available_coupons: config.coupons.clone(),
            prices: PriceBook::new(),
            owner: None,
            pricing: config.pricing.clone(),
            is_loading: false,
            error: None,
            clock,
        }
    }

    /// Carts created from now on belong to `owner`.
    pub fn with_owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    pub fn totals(&self) -> Option<&CartTotals> {
        self.cart.as_ref().map(|c| &c.totals)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn available_coupons(&self) -> &[Coupon] {
        &self.available_coupons
    }

    pub fn price_book(&self) -> &PriceBook {
        &self.prices
    }

    /// Sum of quantities, zero without a cart.
    pub fn item_count(&self) -> u64 {
        self.cart.as_ref().map_or(0, Cart::item_count)
    }

    pub fn start_loading(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
        self.is_loading = false;
    }

    /// Add `quantity` of a product, merging into an existing line.
    pub fn add_item_to_cart(
        &mut self,
        product_id: impl Into<ProductId>,
        quantity: u32,
        options: Option<ItemOptions>,
    ) {
        let product_id = product_id.into();
        let now = self.clock.now();
        let mut cart = match &self.cart {
            Some(cart) => cart.clone(),
            None => Cart::new(
                self.owner.clone(),
                self.pricing.currency,
                now,
                chrono::Duration::hours(self.pricing.cart_ttl_hours),
            ),
        };

        if let Err(e) = cart.add_item(product_id.clone(), quantity, options.unwrap_or_default(), now) {
            warn!(product_id = %product_id, quantity, error = %e, "Rejected cart quantity");
            self.error = Some(e.to_string());
            return;
        }
        self.commit(cart);
    }

    /// Drop a product's line. Removing the last line empties the cart.
    pub fn remove_item_from_cart(&mut self, product_id: &ProductId) {
        self.stage(|cart| Ok(cart.remove_item(product_id)));
    }

    /// Replace a line's quantity. Zero removes the line.
    pub fn update_item_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        self.stage(|cart| {
            cart.update_quantity(product_id, quantity).inspect_err(|e| {
                warn!(product_id = %product_id, quantity, error = %e, "Rejected cart quantity");
            })
        });
    }

    /// Replace a line's options.
    pub fn update_item_options(&mut self, product_id: &ProductId, options: ItemOptions) {
        self.stage(|cart| Ok(cart.update_options(product_id, options)));
    }

    /// Set or clear a line's price override.
    pub fn set_item_price_override(&mut self, product_id: &ProductId, price: Option<Money>) {
        self.stage(|cart| Ok(cart.set_price_override(product_id, price)));
    }

    /// Apply an available coupon by code.
    ///
    /// Unknown codes and a missing cart set the error and change nothing.
    /// Applying a code again appends it again.
    pub fn apply_coupon(&mut self, code: &str) {
        if self.cart.is_none() {
            self.error = Some(CommerceError::EmptyCart.to_string());
            return;
        }

        let Some(coupon) = self
            .available_coupons
            .iter()
            .find(|c| c.matches_code(code))
            .cloned()
        else {
            warn!(code, "Rejected unknown coupon code");
            self.error = Some(CommerceError::InvalidCouponCode(code.to_string()).to_string());
            return;
        };

        self.stage(|cart| {
            cart.apply_coupon(coupon);
            Ok(true)
        });
    }

    pub fn remove_coupon(&mut self, code: &str) {
        self.stage(|cart| Ok(cart.remove_coupon(code)));
    }

    /// Select or clear the shipping option.
    pub fn set_shipping_option(&mut self, option: Option<ShippingOption>) {
        self.stage(|cart| {
            cart.shipping_option = option;
            Ok(true)
        });
    }

    /// Update gift metadata. `None` arguments leave the field as is.
    ///
    /// Totals are not recomputed.
    pub fn set_gift_options(&mut self, message: Option<String>, wrap: Option<bool>) {
        let now = self.clock.now();
        if let Some(cart) = &mut self.cart {
            if let Some(message) = message {
                cart.gift_message = Some(message);
            }
            if let Some(wrap) = wrap {
                cart.gift_wrap = wrap;
            }
            cart.touch(now);
            self.error = None;
        }
    }

    /// Record a price lock lasting `duration` from now.
    ///
    /// Totals are not recomputed and nothing enforces the lock.
    pub fn lock_price(&mut self, duration: chrono::Duration) {
        let now = self.clock.now();
        if let Some(cart) = &mut self.cart {
            cart.price_lock_until = Some(now + duration);
            cart.touch(now);
            self.error = None;
        }
    }

    /// Discard the cart.
    pub fn clear_cart(&mut self) {
        self.cart = None;
        self.error = None;
    }

    /// Replace the cart wholesale and reprice it.
    pub fn set_cart(&mut self, cart: Option<Cart>) {
        match cart {
            Some(cart) => self.commit(cart),
            None => self.clear_cart(),
        }
    }

    /// Reprice the current cart.
    pub fn recalculate(&mut self) {
        self.stage(|_| Ok(true));
    }

    /// Swap the unit prices items resolve against, then reprice.
    pub fn set_price_book(&mut self, prices: PriceBook) {
        let Some(mut cart) = self.cart.clone() else {
            self.prices = prices;
            return;
        };

        match calculate_totals(&cart, &prices, self.pricing.tax_rate_percent) {
            Ok(totals) => {
                cart.totals = totals;
                cart.touch(self.clock.now());
                self.cart = Some(cart);
                self.prices = prices;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Make a coupon code available. Replaces any coupon with the same code.
    pub fn add_available_coupon(&mut self, coupon: Coupon) {
        self.available_coupons.retain(|c| !c.matches_code(&coupon.code));
        self.available_coupons.push(coupon);
    }

    /// Withdraw a coupon code. Coupons already applied to the cart stay.
    pub fn remove_available_coupon(&mut self, code: &str) -> bool {
        let len_before = self.available_coupons.len();
        self.available_coupons.retain(|c| !c.matches_code(code));
        self.available_coupons.len() < len_before
    }

    /// The persisted subset of this store.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            cart: self.cart.clone(),
        }
    }

    /// Load a snapshot verbatim, persisted totals included.
    ///
    /// Nothing is repriced until `set_price_book` or `recalculate` runs.
    /// Expiry and price lock are not checked.
    pub fn restore(&mut self, snapshot: CartSnapshot) {
        self.error = None;
        self.cart = snapshot.cart.filter(|c| !c.is_empty());
        info!(items = self.item_count(), "Restored cart");
    }

    /// Run `mutate` on a copy of the cart and commit it if it changed
    /// something. Without a cart this does nothing.
    fn stage<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut Cart) -> Result<bool, CommerceError>,
    {
        let Some(mut cart) = self.cart.clone() else {
            return;
        };

        match mutate(&mut cart) {
            Ok(true) => self.commit(cart),
            Ok(false) => self.error = None,
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Price `cart` and make it current, or drop it if it has no lines.
    fn commit(&mut self, mut cart: Cart) {
        if cart.is_empty() {
            debug!(cart_id = %cart.id, "Cart emptied");
            self.cart = None;
            self.error = None;
            return;
        }

        match calculate_totals(&cart, &self.prices, self.pricing.tax_rate_percent) {
            Ok(totals) => {
                cart.totals = totals;
                cart.touch(self.clock.now());
                debug!(
                    cart_id = %cart.id,
                    revision = cart.revision,
                    total = %cart.totals.total,
                    "Recomputed cart totals"
                );
                self.cart = Some(cart);
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::money::Currency;
    use chrono::{Duration, TimeZone, Utc};

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    fn store() -> (CartStore, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        let mut config = EngineConfig::default();
        config.coupons.push(Coupon::percentage("SAVE10", 10.0));
        let mut store = CartStore::with_clock(&config, Arc::new(clock.clone()));
        store.set_price_book(PriceBook::new().with_price("X", usd(1_000)));
        (store, clock)
    }

    #[test]
    fn test_first_add_creates_cart() {
        let (mut store, _) = store();
        assert!(store.cart().is_none());

        store.add_item_to_cart("X", 2, None);

        let cart = store.cart().unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.totals.subtotal, usd(2_000));
        assert_eq!(cart.revision, 1);
    }

    #[test]
    fn test_rejected_first_add_leaves_no_cart() {
        let (mut store, _) = store();
        store.add_item_to_cart("X", 0, None);

        assert!(store.cart().is_none());
        assert!(store.error().unwrap().contains("Invalid quantity"));
    }

    #[test]
    fn test_remove_last_item_empties_cart() {
        let (mut store, _) = store();
        store.add_item_to_cart("X", 1, None);
        store.remove_item_from_cart(&ProductId::new("X"));
        assert!(store.cart().is_none());
        assert_eq!(store.item_count(), 0);
    }

    #[test]
    fn test_unknown_coupon_sets_error() {
        let (mut store, _) = store();
        store.add_item_to_cart("X", 1, None);
        let before = store.cart().cloned();

        store.apply_coupon("BOGUS");

        assert_eq!(store.cart().cloned(), before);
        assert_eq!(store.error(), Some("Invalid coupon code: BOGUS"));
    }

    #[test]
    fn test_coupon_without_cart() {
        let (mut store, _) = store();
        store.apply_coupon("SAVE10");
        assert_eq!(store.error(), Some("Cart is empty"));
    }

    #[test]
    fn test_success_clears_error() {
        let (mut store, _) = store();
        store.add_item_to_cart("X", 1, None);
        store.apply_coupon("BOGUS");
        store.apply_coupon("SAVE10");

        assert!(store.error().is_none());
        assert_eq!(store.totals().unwrap().discounts, usd(100));
    }

    #[test]
    fn test_reapplied_coupon_stacks() {
        let (mut store, _) = store();
        store.add_item_to_cart("X", 10, None);
        store.apply_coupon("SAVE10");
        store.apply_coupon("save10");

        assert_eq!(store.cart().unwrap().applied_coupons.len(), 2);
        assert_eq!(store.totals().unwrap().discounts, usd(2_000));

        store.remove_coupon("SAVE10");
        assert!(store.cart().unwrap().applied_coupons.is_empty());
        assert_eq!(store.totals().unwrap().discounts, usd(0));
    }

    #[test]
    fn test_foreign_fixed_coupon_leaves_cart_unchanged() {
        let (mut store, _) = store();
        store.add_item_to_cart("X", 1, None);
        store.add_available_coupon(Coupon::fixed("YEN500", Money::new(500, Currency::JPY)));
        let before = store.cart().cloned();

        store.apply_coupon("YEN500");

        assert_eq!(store.cart().cloned(), before);
        assert!(store.error().unwrap().contains("JPY"));
    }

    #[test]
    fn test_gift_options_do_not_reprice() {
        let (mut store, clock) = store();
        store.add_item_to_cart("X", 1, None);
        let totals = *store.totals().unwrap();
        clock.advance(Duration::minutes(1));

        store.set_gift_options(Some("Happy birthday".to_string()), Some(true));

        let cart = store.cart().unwrap();
        assert_eq!(cart.totals, totals);
        assert_eq!(cart.gift_message.as_deref(), Some("Happy birthday"));
        assert!(cart.gift_wrap);
        assert_eq!(cart.revision, 2);
        assert_eq!(cart.updated_at, clock.now());
    }

    #[test]
    fn test_lock_price_stamps_deadline() {
        let (mut store, clock) = store();
        store.add_item_to_cart("X", 1, None);
        store.lock_price(Duration::minutes(15));
        assert_eq!(
            store.cart().unwrap().price_lock_until,
            Some(clock.now() + Duration::minutes(15))
        );
    }

    #[test]
    fn test_price_book_change_reprices() {
        let (mut store, _) = store();
        store.add_item_to_cart("X", 3, None);
        store.set_price_book(PriceBook::new().with_price("X", usd(500)));
        assert_eq!(store.totals().unwrap().subtotal, usd(1_500));
    }

    #[test]
    fn test_removed_available_coupon() {
        let (mut store, _) = store();
        store.add_item_to_cart("X", 1, None);
        assert!(store.remove_available_coupon("save10"));
        store.apply_coupon("SAVE10");
        assert!(store.error().is_some());
    }

    #[test]
    fn test_loading_flags() {
        let (mut store, _) = store();
        store.set_error(Some("boom".to_string()));
        store.start_loading();
        assert!(store.is_loading());
        assert!(store.error().is_none());
        store.set_error(Some("network".to_string()));
        assert!(!store.is_loading());
    }
}
