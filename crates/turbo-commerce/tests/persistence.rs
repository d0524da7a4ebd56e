mod common;

use common::*;
use serde_json::json;
use std::sync::Arc;
use turbo_cache::Cache;
use turbo_commerce::persist::{self, CART_KEY, CATALOG_KEY};
use turbo_commerce::prelude::*;

#[test]
fn catalog_round_trip_is_byte_identical() {
    let (mut store, clock) = catalog_store();
    let products: Vec<Product> = mixed_catalog(6)
        .into_iter()
        .map(|p| p.with_metadata("sku", json!("SKU-1")).with_metadata("rating", json!(4.5)))
        .collect();
    store.set_products(products);
    store.toggle_favorite(&ProductId::new("p003"));
    store.set_items_per_page(4);

    let cache = Cache::in_memory();
    persist::save_catalog(&cache, &store).unwrap();
    let saved = cache.get_raw(CATALOG_KEY).unwrap().unwrap();

    clock.advance(chrono::Duration::hours(2));
    let mut restored = CatalogStore::with_clock(&EngineConfig::default(), Arc::new(clock.clone()));
    assert!(persist::load_catalog(&cache, &mut restored).unwrap());

    assert_eq!(restored.snapshot().to_json().unwrap(), saved);
    assert_eq!(restored.total_count(), 6);
    assert_eq!(restored.favorite_ids(), &[ProductId::new("p003")]);
    assert_eq!(restored.items_per_page(), 4);
    assert_eq!(restored.index().len(), 6);
    assert_eq!(restored.view().len(), 4);
    assert!(!restored.is_stale(&ProductId::new("p000")));
}

#[test]
fn cart_round_trip_is_byte_identical() {
    let (mut store, clock) = cart_store(vec![Coupon::percentage("SAVE10", 10.0)]);
    let prices = PriceBook::new().with_price("X", usd(3_333)).with_price("Y", usd(100));
    store.set_price_book(prices);
    store.add_item_to_cart("X", 2, Some(ItemOptions::from([("color".to_string(), json!("silver"))])));
    store.add_item_to_cart("Y", 1, None);
    store.apply_coupon("SAVE10");
    store.set_shipping_option(Some(
        ShippingOption::new("express", "Express", usd(1_500)).with_delivery_days(1, 2),
    ));
    store.set_gift_options(Some("Congrats".to_string()), Some(true));
    store.lock_price(chrono::Duration::minutes(30));

    let cache = Cache::in_memory();
    persist::save_cart(&cache, &store).unwrap();
    let saved = cache.get_raw(CART_KEY).unwrap().unwrap();

    clock.advance(chrono::Duration::days(30));
    let (mut restored, _) = cart_store(vec![]);
    assert!(persist::load_cart(&cache, &mut restored).unwrap());

    assert_eq!(restored.snapshot().to_json().unwrap(), saved);
    assert_eq!(restored.cart(), store.cart());
    assert!(restored.error().is_none());
}

#[test]
fn cart_restored_before_prices_keeps_saved_totals() {
    let (mut store, _) = cart_store(vec![]);
    let prices = PriceBook::new().with_price("X", usd(10_000));
    store.set_price_book(prices);
    store.add_item_to_cart("X", 1, None);

    let cache = Cache::in_memory();
    persist::save_cart(&cache, &store).unwrap();
    let saved = cache.get_raw(CART_KEY).unwrap().unwrap();

    let (mut restored, _) = cart_store(vec![]);
    assert!(persist::load_cart(&cache, &mut restored).unwrap());

    assert_eq!(restored.snapshot().to_json().unwrap(), saved);
    assert_eq!(restored.totals().unwrap().total, usd(11_000));

    restored.set_price_book(PriceBook::new().with_price("X", usd(5_000)));
    assert_eq!(restored.totals().unwrap().total, usd(5_500));
}

#[test]
fn expired_cart_is_restored_as_is() {
    let (mut store, clock) = cart_store(vec![]);
    store.add_item_to_cart("X", 1, None);
    let expires_at = store.cart().unwrap().expires_at;

    let cache = Cache::in_memory();
    persist::save_cart(&cache, &store).unwrap();
    clock.set(expires_at + chrono::Duration::days(1));

    let mut restored = CartStore::with_clock(&EngineConfig::default(), Arc::new(clock.clone()));
    persist::load_cart(&cache, &mut restored).unwrap();
    assert_eq!(restored.cart().unwrap().expires_at, expires_at);
    assert_eq!(restored.item_count(), 1);
}

#[test]
fn empty_cart_snapshot() {
    let (store, _) = cart_store(vec![]);
    let cache = Cache::in_memory();
    persist::save_cart(&cache, &store).unwrap();
    assert_eq!(cache.get_raw(CART_KEY).unwrap().unwrap(), b"{\"cart\":null}");
}
