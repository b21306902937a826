//! Facet counts.

use crate::common::*;
use hunch::{QueryEngine, QueryOptions, Query};

#[test]
fn test_facet_counts_ignore_paging() {
    let engine = QueryEngine::new(tagged_bundle(3, "cats"), QueryOptions::default()).unwrap();
    let page = page(&engine, &Query::search("cats").with_page_size(1));

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.facets.unwrap()["tags"]["cats"], 3);
}

#[test]
fn test_list_values_count_each_element() {
    let engine = sample_engine();
    let facets = page(&engine, &Query::search("cats")).facets.unwrap();

    assert_eq!(facets["tags"]["cats"], 1);
    assert_eq!(facets["tags"]["dogs"], 1);
    assert_eq!(facets["tags"]["pets"], 2);
}

#[test]
fn test_scalar_values_count_once() {
    let engine = sample_engine();
    let facets = page(&engine, &Query::listing()).facets.unwrap();
    assert_eq!(facets["kind"]["post"], 2);
    assert_eq!(facets["kind"]["page"], 1);
}

#[test]
fn test_every_bundle_facet_has_a_bucket() {
    let engine = sample_engine();
    let facets = page(&engine, &Query::search("site")).facets.unwrap();

    let names: Vec<&str> = facets.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["tags", "kind"]);
    // about.html has an empty tag list
    assert!(facets["tags"].is_empty());
}

#[test]
fn test_no_facets_configured_means_no_facets_key() {
    let schema = FixtureSchema {
        facets: vec![],
        ..FixtureSchema::default()
    };
    let engine = QueryEngine::new(build_bundle(&sample_files(), &schema), QueryOptions::default())
        .unwrap();
    let response = engine.query(&Query::search("cats")).unwrap();
    assert!(serde_json::to_value(response).unwrap().get("facets").is_none());
}
