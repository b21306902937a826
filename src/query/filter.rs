// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Facet filtering.
//!
//! Two separate mechanisms:
//!
//! - **Short-circuit** ([`cannot_match`]): before the engine runs, check the
//!   query's `boost` and `facets` against the bundle-wide metadata map. A
//!   field no file has, or facet values no file carries, can't produce
//!   results, so the query answers with the empty page straight away.
//!   Values are matched by their string form too, so a facet bucket key
//!   (`"2024"`) sent back finds a numeric value (`2024`).
//! - **Predicate** ([`facet_filter`]): `facetInclude` / `facetExclude` become
//!   a per-document test the engine applies to stored fields.
//!
//! | Document value | include `v`                | exclude `v`          |
//! |----------------|----------------------------|----------------------|
//! | list           | list contains `v`          | list contains `v`    |
//! | scalar         | scalar equals `v`          | scalar equals `v`    |
//! | absent / falsy | never passes               | never excluded       |
//!
//! Including several values against a scalar field can never pass: a scalar
//! equals at most one of them.

use crate::bundle::MetadataToFiles;
use crate::value::{Fields, Scalar};

use super::request::{FacetValues, Query};

/// True when the query provably matches nothing.
pub fn cannot_match(metadata: &MetadataToFiles, query: &Query) -> bool {
    if let Some(boost) = &query.boost {
        if boost.keys().any(|field| !metadata.contains_key(field)) {
            return true;
        }
    }
    if let Some(facets) = &query.facets {
        for (field, wanted) in facets {
            let Some(known) = metadata.get(field) else {
                return true;
            };
            if !wanted.iter().any(|value| is_known(known.keys(), value)) {
                return true;
            }
        }
    }
    false
}

fn is_known<'a>(mut known: impl Iterator<Item = &'a Scalar>, value: &Scalar) -> bool {
    let key = value.to_string();
    known.any(|stored| stored == value || stored.to_string() == key)
}

/// The include/exclude predicate, when the query has either.
pub fn facet_filter(query: &Query) -> Option<impl Fn(&Fields) -> bool + '_> {
    if query.facet_include.is_none() && query.facet_exclude.is_none() {
        return None;
    }
    let include = query.facet_include.as_ref();
    let exclude = query.facet_exclude.as_ref();
    Some(move |document: &Fields| passes(document, include, exclude))
}

fn passes(document: &Fields, include: Option<&FacetValues>, exclude: Option<&FacetValues>) -> bool {
    let included = include.map_or(true, |include| {
        include.iter().all(|(field, values)| {
            document
                .get(field)
                .filter(|v| v.is_truthy())
                .is_some_and(|v| values.iter().all(|value| v.holds(value)))
        })
    });
    let excluded = exclude.is_some_and(|exclude| {
        exclude.iter().any(|(field, values)| {
            document
                .get(field)
                .is_some_and(|v| values.iter().any(|value| v.holds(value)))
        })
    });
    included && !excluded
}
