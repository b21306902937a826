//! Paging arithmetic.

use crate::common::*;
use hunch::{HunchConfig, PageInfo, Query, QueryEngine, QueryOptions};

fn engine_with(count: usize) -> QueryEngine {
    QueryEngine::new(tagged_bundle(count, "cats"), QueryOptions::default()).unwrap()
}

#[test]
fn test_twelve_items_in_pages_of_ten() {
    let engine = engine_with(12);
    let first = page(&engine, &Query::search("cats").with_page(10, 0));

    assert_eq!(
        first.page,
        PageInfo { items: 12, offset: Some(0), pages: Some(2), size: Some(10) }
    );
    assert_eq!(first.items.len(), 10);

    let second = page(&engine, &Query::search("cats").with_page(10, 1));
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.items[0].id, "/posts/10.html");
}

#[test]
fn test_twelve_items_in_pages_of_six() {
    let engine = engine_with(12);
    let page = page(&engine, &Query::search("cats").with_page_size(6));
    assert_eq!(page.page.pages, Some(2));
    assert_eq!(page.items.len(), 6);
}

#[test]
fn test_page_count_is_rounded_not_ceiled() {
    let engine = engine_with(16);
    let page = page(&engine, &Query::search("cats").with_page_size(10));
    // round(1.6) + 1
    assert_eq!(page.page.pages, Some(3));
}

#[test]
fn test_page_size_zero_returns_everything() {
    let engine = engine_with(10);
    let response = engine.query(&Query::search("cats").with_page_size(0)).unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["page"], serde_json::json!({"items": 10}));
    assert_eq!(response.into_page().unwrap().items.len(), 10);
}

#[test]
fn test_default_page_size() {
    let engine = engine_with(20);
    let page = page(&engine, &Query::search("cats"));
    assert_eq!(page.items.len(), 15);
    assert_eq!(page.page.size, Some(15));
    assert_eq!(page.page.pages, Some(2));
}

#[test]
fn test_negative_page_size_means_default() {
    let engine = engine_with(20);
    let page = page(&engine, &Query::search("cats").with_page_size(-1));
    assert_eq!(page.page.size, Some(15));
}

#[test]
fn test_offset_past_the_end() {
    let engine = engine_with(12);
    let page = page(&engine, &Query::search("cats").with_page(10, 5));
    assert!(page.items.is_empty());
    assert_eq!(page.page.items, 12);
    assert_eq!(page.page.offset, Some(5));
}

#[test]
fn test_default_page_size_from_config() {
    let config = HunchConfig::from_toml_str("default_page_size = 4").unwrap();
    let engine =
        QueryEngine::new(tagged_bundle(10, "cats"), QueryOptions::from_config(&config)).unwrap();
    let page = page(&engine, &Query::search("cats"));
    assert_eq!(page.items.len(), 4);
}

#[test]
fn test_max_page_size_is_advisory() {
    let engine = QueryEngine::new(
        tagged_bundle(10, "cats"),
        QueryOptions::default().with_max_page_size(3),
    )
    .unwrap();
    assert_eq!(engine.max_page_size(), Some(3));
    let page = page(&engine, &Query::search("cats").with_page_size(8));
    assert_eq!(page.items.len(), 8);
}
