//! Facet include/exclude filtering in search mode.

use crate::common::*;
use hunch::Query;

#[test]
fn test_include_keeps_only_matching_files() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("cats").with_include("tags", ["dogs"]));
    assert_eq!(page.ids(), vec!["/posts/dogs.html"]);
}

#[test]
fn test_include_requires_every_listed_value() {
    let engine = sample_engine();
    let both = page(&engine, &Query::search("cats").with_include("tags", ["cats", "pets"]));
    assert_eq!(both.ids(), vec!["/posts/cats.html"]);

    let impossible = page(&engine, &Query::search("cats").with_include("tags", ["cats", "dogs"]));
    assert!(impossible.is_empty());
}

#[test]
fn test_include_several_values_on_scalar_never_matches() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("cats").with_include("kind", ["post", "page"]));
    assert!(page.is_empty());
}

#[test]
fn test_exclude_drops_matching_files() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("cats").with_exclude("tags", ["dogs"]));
    assert_eq!(page.ids(), vec!["/posts/cats.html"]);
}

#[test]
fn test_exclude_scalar_value() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("about").with_exclude("kind", ["page"]));
    assert_eq!(page.ids(), vec!["/posts/cats.html"]);
}

#[test]
fn test_filters_shape_facet_counts() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("cats").with_include("tags", ["dogs"]));
    let facets = page.facets.unwrap();
    assert_eq!(facets["tags"].get("cats"), None);
    assert_eq!(facets["tags"]["dogs"], 1);
}
