// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Facet aggregation.
//!
//! Counts are taken over the whole de-duplicated result set, never over the
//! page being returned: "cats (3)" must mean three matching files whichever
//! page the reader is on.

use indexmap::IndexMap;

use crate::bundle::FILE_FIELD;
use crate::engine::SearchHit;

/// Facet name → value (string form) → number of results carrying it.
pub type FacetCounts = IndexMap<String, IndexMap<String, usize>>;

/// Count facet values over `hits`. Every facet gets a bucket, even if empty.
///
/// List values count once per element; scalars count once. Falsy values
/// (absent, `false`, `0`, `""`) don't count.
pub fn aggregate(facets: &[String], hits: &[SearchHit]) -> FacetCounts {
    let mut counts: FacetCounts = facets
        .iter()
        .map(|facet| (facet.clone(), IndexMap::new()))
        .collect();

    for hit in hits {
        for (facet, buckets) in counts.iter_mut() {
            if facet == FILE_FIELD {
                continue;
            }
            let Some(value) = hit.stored.get(facet).filter(|v| v.is_truthy()) else {
                continue;
            };
            for scalar in value.facet_scalars() {
                *buckets.entry(scalar.to_string()).or_insert(0) += 1;
            }
        }
    }
    counts
}
