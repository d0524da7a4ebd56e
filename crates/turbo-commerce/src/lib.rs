//! Catalog query and cart pricing engine for TurboCommerce.
//!
//! - **Catalog**: products, search index, fetch-time tracking, catalog store
//! - **Search**: filter state, sort orders, the filter/sort/paginate pipeline
//! - **Cart**: cart items, coupons, shipping, pricing calculator, cart store
//! - **Persist**: snapshots of both stores through `turbo-cache`
//!
//! Stores are plain owned values. Build them from an [`EngineConfig`] and pass
//! them where they are needed.
//!
//! # Example
//!
//! ```rust
//! use turbo_commerce::prelude::*;
//!
//! let config = EngineConfig::default();
//! let mut catalog = CatalogStore::new(&config);
//! catalog.add_product(Product::new(
//!     "lens-35",
//!     "Prime Lens",
//!     Category::Lenses,
//!     Money::new(49_900, Currency::USD),
//!     ProductDetails::Physical(PhysicalDetails::new("Sigma", "35mm Art")),
//! ));
//! catalog.search_products("prime");
//! assert_eq!(catalog.view().len(), 1);
//!
//! let mut cart = CartStore::new(&config);
//! cart.set_price_book(catalog.price_book());
//! cart.add_item_to_cart("lens-35", 2, None);
//! let totals = cart.totals().unwrap();
//! assert_eq!(totals.subtotal.amount_cents, 99_800);
//! assert_eq!(totals.total.display(), "$1097.80");
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod persist;
pub mod search;

pub use config::EngineConfig;
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::{CatalogConfig, EngineConfig, PricingConfig};
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        CatalogStore, Category, CategoryStats, DigitalDetails, PhysicalDetails, Product,
        ProductChange, ProductDetails, ProductPatch, ProductSource, SearchIndex,
    };

    // Search
    pub use crate::search::{CatalogView, FilterState, Pagination, PriceRange, SortBy};

    // Cart
    pub use crate::cart::{
        calculate_totals, Cart, CartItem, CartStore, CartTotals, Coupon, CouponType,
        CouponValue, ItemOptions, PriceBook, ShippingOption, MAX_QUANTITY_PER_ITEM,
    };

    // Persistence
    pub use crate::persist::{CartSnapshot, CatalogSnapshot};
}
