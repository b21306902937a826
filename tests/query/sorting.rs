//! The pre-pagination sort hook.

use crate::common::*;
use hunch::{Query, QueryEngine, QueryOptions};

#[test]
fn test_sort_reorders_before_paging() {
    let options = QueryOptions::default().with_sort(|mut hits, _query| {
        hits.reverse();
        hits
    });
    let engine = QueryEngine::new(tagged_bundle(5, "cats"), options).unwrap();
    let page = page(&engine, &Query::search("cats").with_page_size(2));

    assert_eq!(page.ids(), vec!["/posts/4.html", "/posts/3.html"]);
    assert_eq!(page.page.items, 5);
}

#[test]
fn test_sort_sees_deduplicated_hits_and_the_query() {
    let options = QueryOptions::default().with_sort(|hits, query| {
        let mut parents: Vec<&str> = hits.iter().map(|h| hunch::bundle::parent_id(&h.id)).collect();
        parents.dedup();
        assert_eq!(parents.len(), hits.len());
        assert_eq!(query.q.as_deref(), Some("cats"));
        hits
    });
    let engine = QueryEngine::new(sample_bundle(), options).unwrap();
    assert_eq!(page(&engine, &Query::search("cats")).items.len(), 2);
}

#[test]
fn test_facets_follow_sorted_set() {
    let options = QueryOptions::default().with_sort(|hits, _| hits.into_iter().take(1).collect());
    let engine = QueryEngine::new(sample_bundle(), options).unwrap();
    let page = page(&engine, &Query::search("cats"));

    assert_eq!(page.page.items, 1);
    assert_eq!(page.facets.unwrap()["tags"]["pets"], 1);
}
