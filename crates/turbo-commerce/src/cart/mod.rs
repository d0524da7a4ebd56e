//! Shopping cart module.
//!
//! Contains the cart model, coupons, shipping options, the pricing
//! calculator, and the store that ties them together.

mod cart;
mod discount;
mod pricing;
mod shipping;
mod store;

pub use cart::{Cart, CartItem, ItemOptions, MAX_QUANTITY_PER_ITEM};
pub use discount::{Coupon, CouponType, CouponValue};
pub use pricing::{calculate_totals, CartTotals, PriceBook};
pub use shipping::ShippingOption;
pub use store::CartStore;
