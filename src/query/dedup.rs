// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Chunk de-duplication.
//!
//! Long files are indexed as several chunks (`"7:0"`, `"7:1"`, ...). Without
//! de-duplication one long file matching in every chunk would fill a whole
//! result page and every facet bucket with copies of itself.
//!
//! **Invariant**: at most one hit per parent id, and it is the first one the
//! engine returned for that parent. Engines return hits best first, so the
//! survivor is the best-scoring chunk.

use std::collections::HashSet;

use crate::bundle::parent_id;
use crate::engine::SearchHit;

/// Keep the first hit per parent id, preserving order.
pub fn dedup_chunks(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen: HashSet<String> = HashSet::with_capacity(hits.len());
    hits.into_iter()
        .filter(|hit| seen.insert(parent_id(&hit.id).to_string()))
        .collect()
}
