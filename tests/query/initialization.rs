//! Lazy, single engine initialization.

use std::thread;

use crate::common::*;
use hunch::{HunchError, Query, QueryEngine, QueryOptions};

#[test]
fn test_sequential_queries_load_once() {
    let (engine, counter) = counting_engine();
    page(&engine, &Query::search("cats"));
    page(&engine, &Query::search("dogs"));
    engine.query(&Query::suggest("ca")).unwrap();

    assert_eq!(counter.loads(), 1);
    assert_eq!(counter.searches(), 3);
}

#[test]
fn test_concurrent_first_queries_load_once() {
    let (engine, counter) = counting_engine();
    let engine = &engine;

    thread::scope(|scope| {
        for i in 0..8 {
            scope.spawn(move || {
                let text = if i % 2 == 0 { "cats" } else { "dogs" };
                page(&engine, &Query::search(text));
            });
        }
    });

    assert_eq!(counter.loads(), 1);
    assert_eq!(counter.searches(), 8);
}

#[test]
fn test_corrupt_engine_index_is_engine_error() {
    let mut bundle = sample_bundle();
    bundle.index.document_count = 99;
    let engine = QueryEngine::new(bundle, QueryOptions::default()).unwrap();

    let err = engine.query(&Query::search("cats")).unwrap_err();
    assert!(matches!(err, HunchError::Engine(_)));
    assert!(!engine.is_loaded());

    // Listing never touches the engine
    assert_eq!(page(&engine, &Query::listing()).page.items, 3);
}

#[test]
fn test_dangling_file_reference_fails_at_construction() {
    let mut bundle = sample_bundle();
    bundle.files_list.pop();
    let err = QueryEngine::new(bundle, QueryOptions::default()).unwrap_err();
    assert!(matches!(err, HunchError::Config(_)));
}
