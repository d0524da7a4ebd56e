//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use turbo_commerce::prelude::*;

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()
}

pub fn usd(cents: i64) -> Money {
    Money::new(cents, Currency::USD)
}

pub fn camera(id: &str, title: &str, cents: i64) -> Product {
    Product::new(
        id,
        title,
        Category::Cameras,
        usd(cents),
        ProductDetails::Physical(PhysicalDetails::new("Fujifilm", "X-T5")),
    )
    .with_updated_at(start())
}

pub fn preset(id: &str, title: &str, cents: i64) -> Product {
    let mut details = DigitalDetails::new("xmp", "3.0");
    details.compatibility.push("Lightroom".to_string());
    Product::new(id, title, Category::Presets, usd(cents), ProductDetails::Digital(details))
        .with_tag("film")
        .with_updated_at(start())
}

/// `count` products alternating between cameras and presets.
pub fn mixed_catalog(count: usize) -> Vec<Product> {
    (0..count)
        .map(|i| {
            let id = format!("p{i:03}");
            let product = if i % 2 == 0 {
                camera(&id, &format!("Camera {i}"), 10_000 + (i as i64 * 37) % 500)
            } else {
                preset(&id, &format!("Preset Pack {i}"), 1_000 + (i as i64 * 53) % 300)
            };
            product.with_updated_at(start() - Duration::hours((i as i64 * 7) % 24))
        })
        .collect()
}

pub fn catalog_store() -> (CatalogStore, ManualClock) {
    let clock = ManualClock::new(start());
    let store = CatalogStore::with_clock(&EngineConfig::default(), Arc::new(clock.clone()));
    (store, clock)
}

pub fn cart_store(coupons: Vec<Coupon>) -> (CartStore, ManualClock) {
    let clock = ManualClock::new(start());
    let config = EngineConfig {
        coupons,
        ..EngineConfig::default()
    };
    let store = CartStore::with_clock(&config, Arc::new(clock.clone()));
    (store, clock)
}
