//! Empty-set short-circuit: queries that provably match nothing.

use crate::common::*;
use hunch::{Query, QueryEngine, QueryOptions, ResultPage};

#[test]
fn test_unknown_facet_value_returns_empty_page_without_engine() {
    let (engine, counter) = counting_engine();
    let query = Query::search("cats").with_facet("tags", ["rare"]);

    let page = page(&engine, &query);

    assert_eq!(page, ResultPage::empty());
    assert_eq!(counter.loads(), 0);
    assert_eq!(counter.searches(), 0);
}

#[test]
fn test_unknown_facet_field_returns_empty_page() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("cats").with_facet("color", ["red"]));
    assert_eq!(page, ResultPage::empty());
}

#[test]
fn test_known_facet_value_runs_the_query() {
    let (engine, counter) = counting_engine();
    let page = page(&engine, &Query::search("cats").with_facet("tags", ["rare", "dogs"]));
    assert!(!page.is_empty());
    assert_eq!(counter.searches(), 1);
}

#[test]
fn test_boost_on_unknown_field_returns_empty_page() {
    let (engine, counter) = counting_engine();
    let page = page(&engine, &Query::search("cats").with_boost("color", 2.0));
    assert_eq!(page, ResultPage::empty());
    assert_eq!(counter.searches(), 0);
}

#[test]
fn test_boost_on_known_field_runs_the_query() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("cats").with_boost("title", 2.0));
    assert!(!page.is_empty());
}

#[test]
fn test_short_circuit_applies_to_listing_mode() {
    let engine = sample_engine();
    let page = page(&engine, &Query::listing().with_facet("tags", ["rare"]));
    assert_eq!(page, ResultPage::empty());
}

#[test]
fn test_short_circuit_applies_to_suggest_mode() {
    let engine = sample_engine();
    let response = engine
        .query(&Query::suggest("ca").with_facet("tags", ["rare"]))
        .unwrap();
    assert_eq!(response.into_page(), Some(ResultPage::empty()));
}

#[test]
fn test_empty_page_wire_shape() {
    let engine = sample_engine();
    let response = engine
        .query_json(r#"{"q": "cats", "facets": {"tags": ["rare"]}}"#)
        .unwrap();
    assert_eq!(
        serde_json::to_value(response).unwrap(),
        serde_json::json!({"items": [], "page": {"items": 0, "offset": 0, "pages": 0}})
    );
}

fn yearly_engine() -> QueryEngine {
    let files = vec![
        FixtureFile::new(
            "/posts/cats.html",
            serde_json::json!({"title": "Cats", "tags": ["pets"], "year": 2024}),
            &["cats purr"],
        ),
        FixtureFile::new(
            "/posts/dogs.html",
            serde_json::json!({"title": "Dogs", "tags": ["pets"], "year": 2023}),
            &["dogs chase cats"],
        ),
    ];
    let schema = FixtureSchema {
        facets: vec!["tags".into(), "year".into()],
        ..FixtureSchema::default()
    };
    QueryEngine::new(build_bundle(&files, &schema), QueryOptions::default()).unwrap()
}

#[test]
fn test_facet_bucket_key_round_trips_for_numeric_values() {
    let engine = yearly_engine();
    let facets = page(&engine, &Query::search("cats")).facets.unwrap();
    let key = facets["year"].keys().next().cloned().unwrap();

    let page = page(&engine, &Query::search("cats").with_facet("year", [key.as_str()]));
    assert_eq!(page.page.items, 2);
}

#[test]
fn test_facet_bucket_key_via_json() {
    let engine = yearly_engine();
    let response = engine
        .query_json(r#"{"q": "cats", "facets": {"year": ["2024"]}}"#)
        .unwrap();
    assert!(!response.into_page().unwrap().is_empty());
}

#[test]
fn test_include_filter_stays_strict_on_type() {
    let engine = yearly_engine();
    let by_string = page(&engine, &Query::search("cats").with_include("year", ["2024"]));
    assert!(by_string.is_empty());

    let by_number = page(&engine, &Query::search("cats").with_include("year", [2024_i64]));
    assert_eq!(by_number.ids(), vec!["/posts/cats.html"]);
}
