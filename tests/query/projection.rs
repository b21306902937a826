//! Result item projection.

use crate::common::*;
use hunch::{MetaValue, Query, QueryEngine, QueryOptions};
use serde_json::json;

#[test]
fn test_item_id_is_file_path() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("dogs"));
    assert_eq!(page.items[0].id, "/posts/dogs.html");
}

#[test]
fn test_engine_fields_are_dropped() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("dogs"));
    let item = serde_json::to_value(&page.items[0]).unwrap();

    for internal in ["_file", "id", "score", "terms", "match"] {
        assert!(item.get(internal).is_none(), "{} leaked into the item", internal);
    }
    assert_eq!(item["_id"], "/posts/dogs.html");
    assert_eq!(item["title"], "Dogs");
    assert_eq!(item["tags"], json!(["dogs", "pets"]));
}

#[test]
fn test_score_rounded_to_three_decimals() {
    let engine = sample_engine();
    for item in page(&engine, &Query::search("cats")).items {
        let scaled = item.score * 1000.0;
        assert!((scaled - scaled.round()).abs() < 1e-6, "score not rounded: {}", item.score);
    }
}

#[test]
fn test_stored_fields_merged_from_file_metadata() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("cats"));
    // `summary` lives only in file metadata
    assert_eq!(page.items[0].fields["summary"], MetaValue::str("Everything cats"));
    assert_eq!(page.items[1].fields["summary"], MetaValue::str("Dogs and their people"));
}

#[test]
fn test_files_without_stored_value_get_nothing() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("site"));
    assert_eq!(page.items[0].id, "/pages/about.html");
    assert!(!page.items[0].fields.contains_key("summary"));
}

fn set_chunk_titles(bundle: &mut hunch::Bundle, title: &str) {
    // Short ids 0 and 1 are the two chunks of /posts/cats.html
    for short in [0, 1] {
        let stored = bundle.index.stored_fields.get_mut(&short).unwrap();
        stored.insert("title".to_string(), MetaValue::str(title));
    }
}

#[test]
fn test_item_value_wins_over_file_metadata() {
    let mut bundle = sample_bundle();
    set_chunk_titles(&mut bundle, "Chunk Title");
    let engine = QueryEngine::new(bundle, QueryOptions::default()).unwrap();

    let page = page(&engine, &Query::search("purr"));
    assert_eq!(page.items[0].id, "/posts/cats.html");
    assert_eq!(page.items[0].fields["title"], MetaValue::str("Chunk Title"));
}

#[test]
fn test_falsy_item_value_filled_from_file_metadata() {
    let mut bundle = sample_bundle();
    set_chunk_titles(&mut bundle, "");
    let engine = QueryEngine::new(bundle, QueryOptions::default()).unwrap();

    let page = page(&engine, &Query::search("purr"));
    assert_eq!(page.items[0].fields["title"], MetaValue::str("All About Cats"));
}
