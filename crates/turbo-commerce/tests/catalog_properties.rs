mod common;

use common::*;
use std::collections::HashSet;
use turbo_commerce::prelude::*;
use turbo_commerce::search::pipeline;

#[test]
fn add_then_remove_leaves_no_index_entry() {
    let (mut store, _) = catalog_store();
    store.set_products(mixed_catalog(4));
    let before = store.total_count();

    store.add_product(camera("extra", "Rangefinder", 250_000));
    assert_eq!(store.total_count(), before + 1);
    assert!(store.index().contains(&ProductId::new("extra")));

    store.remove_product(&ProductId::new("extra"));
    assert!(!store.index().contains(&ProductId::new("extra")));
    assert_eq!(store.last_fetched(&ProductId::new("extra")), None);
    assert_eq!(store.total_count(), before);
    assert_eq!(store.index().len(), store.products().len());
}

#[test]
fn pipeline_is_idempotent() {
    let products = mixed_catalog(30);
    let index = SearchIndex::from_products(&products);
    let favorites: HashSet<ProductId> = ["p003", "p010", "p021"].into_iter().map(ProductId::new).collect();

    for sort_by in [SortBy::Price, SortBy::Date, SortBy::Popularity, SortBy::None] {
        let filters = FilterState::new()
            .with_search("pack")
            .with_price_range(usd(1_000), usd(1_200))
            .with_sort(sort_by);

        let first: Vec<Product> = pipeline::filter_and_sort(&products, &index, &filters, &favorites)
            .into_iter()
            .cloned()
            .collect();
        let second: Vec<&Product> = pipeline::filter_and_sort(&first, &index, &filters, &favorites);

        let first_ids: Vec<&ProductId> = first.iter().map(|p| &p.id).collect();
        let second_ids: Vec<&ProductId> = second.iter().map(|p| &p.id).collect();
        assert_eq!(first_ids, second_ids, "sort {:?}", sort_by);
    }
}

#[test]
fn forty_five_results_paginate_in_three_pages() {
    let (mut store, _) = catalog_store();
    store.set_products(mixed_catalog(45));
    store.set_items_per_page(20);

    assert_eq!(store.view().len(), 20);
    assert!(store.has_next_page());

    store.load_next_page();
    assert_eq!(store.current_page(), 2);
    assert_eq!(store.view().len(), 20);
    assert!(store.has_next_page());

    store.load_next_page();
    assert_eq!(store.current_page(), 3);
    assert_eq!(store.view().len(), 5);
    assert!(!store.has_next_page());

    store.load_next_page();
    assert_eq!(store.current_page(), 3);
}

#[test]
fn has_next_page_follows_catalog_changes() {
    let (mut store, _) = catalog_store();
    store.set_items_per_page(20);
    store.set_products(mixed_catalog(20));
    assert!(!store.has_next_page());

    store.add_product(camera("late", "Late Arrival", 1));
    assert!(store.has_next_page());
}

#[test]
fn batch_remove_runs_pipeline_once() {
    let (mut store, _) = catalog_store();
    store.set_products(mixed_catalog(10));
    let count = store.total_count();
    let runs = store.recompute_count();

    let ids = [ProductId::new("p002"), ProductId::new("p007")];
    store.batch_remove_products(&ids);

    assert_eq!(store.recompute_count(), runs + 1);
    assert_eq!(store.total_count(), count - 2);
    for id in &ids {
        assert!(!store.index().contains(id));
        assert!(store.get_product(id).is_none());
    }
}

#[test]
fn batch_update_runs_pipeline_once() {
    let (mut store, clock) = catalog_store();
    store.set_products(mixed_catalog(10));
    let runs = store.recompute_count();
    clock.advance(chrono::Duration::seconds(5));

    store.batch_update_products(vec![
        ProductChange::new("p000", ProductPatch::new().title("Medium Format")),
        ProductChange::new("p001", ProductPatch::new().price(usd(99))),
        ProductChange::new("missing", ProductPatch::new().title("Ghost")),
    ]);

    assert_eq!(store.recompute_count(), runs + 1);
    store.search_products("medium format");
    assert_eq!(store.view().len(), 1);
    let updated = store.get_product(&ProductId::new("p001")).unwrap();
    assert_eq!(updated.price, usd(99));
    assert_eq!(updated.updated_at, clock.now());
    assert_eq!(store.total_count(), 10);
}

#[test]
fn favorites_lead_popularity_sort() {
    let (mut store, _) = catalog_store();
    store.set_products(mixed_catalog(6));
    store.toggle_favorite(&ProductId::new("p004"));
    store.toggle_favorite(&ProductId::new("p001"));
    store.sort_products(SortBy::Popularity);

    let ids: Vec<&str> = store.view().items.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p001", "p004", "p000", "p002", "p003", "p005"]);
}

#[test]
fn reset_filters_restores_full_view() {
    let (mut store, _) = catalog_store();
    store.set_products(mixed_catalog(8));
    store.filter_by_category(Some(Category::Presets));
    store.search_products("lightroom");
    assert_eq!(store.view().total_matches(), 4);

    store.reset_filters();
    assert_eq!(store.view().total_matches(), 8);
    assert_eq!(store.filters(), &FilterState::default());
}
