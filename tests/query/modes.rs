//! Listing, search, and suggest modes.

use crate::common::*;
use hunch::{HunchError, Query, ResultPage};

#[test]
fn test_listing_returns_every_file_in_storage_order() {
    let engine = sample_engine();
    let page = page(&engine, &Query::listing());

    assert_eq!(
        page.ids(),
        vec!["/posts/cats.html", "/posts/dogs.html", "/pages/about.html"]
    );
    assert!(page.items.iter().all(|item| item.score == 0.0));
}

#[test]
fn test_listing_does_not_load_the_engine() {
    let (engine, counter) = counting_engine();
    page(&engine, &Query::listing());
    assert_eq!(counter.loads(), 0);
    assert!(!engine.is_loaded());
}

#[test]
fn test_empty_text_is_listing_mode() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search(""));
    assert_eq!(page.page.items, 3);
}

#[test]
fn test_listing_ignores_include_filters() {
    let engine = sample_engine();
    let page = page(&engine, &Query::listing().with_include("tags", ["dogs"]));
    assert_eq!(page.page.items, 3);
}

#[test]
fn test_search_ranks_best_match_first() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("cats"));

    assert_eq!(page.ids(), vec!["/posts/cats.html", "/posts/dogs.html"]);
    assert!(page.items[0].score > page.items[1].score);
}

#[test]
fn test_search_without_matches_returns_empty_page() {
    let engine = sample_engine();
    assert_eq!(page(&engine, &Query::search("zebra")), ResultPage::empty());
}

#[test]
fn test_search_with_prefix() {
    let engine = sample_engine();
    assert!(page(&engine, &Query::search("slee")).is_empty());
    let page = page(&engine, &Query::search("slee").with_prefix());
    assert_eq!(page.ids(), vec!["/posts/cats.html"]);
}

#[test]
fn test_search_with_fuzzy() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("bork").with_fuzzy(hunch::Fuzzy::Distance(1.0)));
    assert_eq!(page.ids(), vec!["/posts/dogs.html"]);
}

#[test]
fn test_search_restricted_to_fields() {
    let engine = sample_engine();
    // "cats" is in the dogs page's text, not its title
    let page = page(&engine, &Query::search("cats").with_fields(["title"]));
    assert_eq!(page.ids(), vec!["/posts/cats.html"]);
}

#[test]
fn test_suggest_completes_last_word() {
    let engine = sample_engine();
    let suggestions = engine
        .query(&Query::suggest("ca"))
        .unwrap()
        .into_suggestions()
        .unwrap();

    assert_eq!(suggestions[0].q, "cats");
    for suggestion in &suggestions {
        let scaled = suggestion.score * 1000.0;
        assert!((scaled - scaled.round()).abs() < 1e-6, "score not rounded: {}", suggestion.score);
    }
}

#[test]
fn test_suggest_without_text() {
    let engine = sample_engine();
    let response = engine.query_json(r#"{"suggest": true}"#).unwrap();
    assert_eq!(
        serde_json::to_value(response).unwrap(),
        serde_json::json!({"suggestions": []})
    );
}

#[test]
fn test_suggest_skips_paging_and_facets() {
    let engine = sample_engine();
    let response = engine.query(&Query::suggest("dog").with_page_size(0)).unwrap();
    let json = serde_json::to_value(response).unwrap();
    assert!(json.get("page").is_none());
    assert!(json.get("facets").is_none());
    assert_eq!(json["suggestions"][0]["q"], "dogs");
}

#[test]
fn test_malformed_json_query_is_query_error() {
    let engine = sample_engine();
    let err = engine
        .query_json(r#"{"q": "cats", "facetExclude": {"tags": "dogs"}}"#)
        .unwrap_err();
    assert!(matches!(err, HunchError::Query(_)));
}

#[test]
fn test_stop_words_from_options() {
    let engine = hunch::QueryEngine::new(
        sample_bundle(),
        hunch::QueryOptions::default().with_stop_words(["cats"]),
    )
    .unwrap();
    assert!(page(&engine, &Query::search("cats")).is_empty());
    assert!(!page(&engine, &Query::search("dogs")).is_empty());
}
