//! Chunk de-duplication.

use std::collections::HashSet;

use crate::common::*;
use hunch::{MetaValue, Query};

#[test]
fn test_one_item_per_file() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("cats"));

    let ids: HashSet<&str> = page.items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids.len(), page.items.len());
    assert_eq!(page.page.items, 2);
}

#[test]
fn test_best_chunk_survives() {
    let engine = sample_engine();
    let page = page(&engine, &Query::search("cats sleeping"));

    let cats = &page.items[0];
    assert_eq!(cats.id, "/posts/cats.html");
    assert_eq!(cats.fields["_content"], MetaValue::str("more cats sleeping in the sun"));
}

#[test]
fn test_listing_dedups_too() {
    let engine = sample_engine();
    let page = page(&engine, &Query::listing());
    // Four chunks, three files
    assert_eq!(engine.bundle().chunks.len(), 4);
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.items[0].fields["_content"], MetaValue::str("cats purr and nap all day"));
}
