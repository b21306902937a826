// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result pages: pagination and item projection.
//!
//! # Page arithmetic
//!
//! | `pageSize`        | Items returned                 | `page`                          |
//! |-------------------|--------------------------------|---------------------------------|
//! | absent / negative | default size (15)              | `{items, offset, pages, size}`  |
//! | `0`               | all of them                    | `{items}`                       |
//! | `n > 0`           | `[n*offset, n*offset + n)`     | `{items, offset, pages, size}`  |
//!
//! The page count is **not** a ceiling: `total/size` when it divides evenly,
//! otherwise `round(total/size) + 1`. For 12 items of 10 that is
//! `round(1.2) + 1 = 2`, but for 16 items of 10 it is `round(1.6) + 1 = 3`.
//! Clients in the wild page with this number, so it stays.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::bundle::{parent_id, UnpackedBundle, FILE_FIELD};
use crate::engine::SearchHit;
use crate::scoring::round_score;
use crate::value::{Fields, MetaValue};

use super::facets::FacetCounts;

/// Page size when a query doesn't ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Hit fields that never reach a result item.
const INTERNAL_FIELDS: [&str; 7] = ["id", "score", "terms", "match", FILE_FIELD, "_id", "_score"];

/// Where a page sits in the full result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Total results across all pages.
    pub items: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

impl PageInfo {
    /// Page info for `total` results split into pages of `size`.
    /// A size of 0 means "no paging".
    pub fn new(total: usize, size: usize, offset: usize) -> Self {
        if size == 0 {
            return Self {
                items: total,
                offset: None,
                pages: None,
                size: None,
            };
        }
        Self {
            items: total,
            offset: Some(offset),
            pages: Some(page_count(total, size)),
            size: Some(size),
        }
    }

    /// Index range of this page's items. Unpaged means everything.
    pub fn window(&self) -> Range<usize> {
        match self.size {
            Some(size) => {
                let start = size.saturating_mul(self.offset.unwrap_or(0));
                start..start.saturating_add(size)
            }
            None => 0..self.items,
        }
    }
}

/// Number of pages, with the rounding rule from the module docs.
pub fn page_count(total: usize, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    if total % size == 0 {
        total / size
    } else {
        (total as f64 / size as f64).round() as usize + 1
    }
}

/// One result: a file, its score, and its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    /// File path.
    #[serde(rename = "_id")]
    pub id: String,
    /// Rounded to 3 decimals.
    #[serde(rename = "_score")]
    pub score: f64,
    #[serde(flatten)]
    pub fields: Fields,
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub items: Vec<ResultItem>,
    pub page: PageInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<FacetCounts>,
}

impl ResultPage {
    /// The canonical empty page: `{items: [], page: {items: 0, offset: 0, pages: 0}}`.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page: PageInfo {
                items: 0,
                offset: Some(0),
                pages: Some(0),
                size: None,
            },
            facets: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item ids in page order.
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id.as_str()).collect()
    }
}

/// The hits inside `page`'s window.
pub fn paginate(hits: Vec<SearchHit>, page: &PageInfo) -> Vec<SearchHit> {
    let window = page.window();
    hits.into_iter()
        .skip(window.start)
        .take(window.end - window.start)
        .collect()
}

/// Turn a hit into a result item.
///
/// Engine bookkeeping is dropped, `_id` becomes the file path (the parent id
/// when no path is stored), and stored fields the item lacks are filled in
/// from the file's metadata.
pub fn project(hit: SearchHit, bundle: &UnpackedBundle) -> ResultItem {
    let SearchHit {
        id: hit_id,
        score,
        stored: mut fields,
        ..
    } = hit;

    let path = fields
        .get(FILE_FIELD)
        .and_then(MetaValue::as_str)
        .map(str::to_string);
    for internal in INTERNAL_FIELDS {
        fields.shift_remove(internal);
    }
    let id = path.unwrap_or_else(|| parent_id(&hit_id).to_string());

    if !bundle.stored_fields.is_empty() {
        let file_meta = bundle.file_metadata_for(&id).or_else(|| {
            bundle
                .file_index_of_chunk(&hit_id)
                .ok()
                .and_then(|position| bundle.file_metadata.get(position))
                .and_then(Option::as_ref)
        });
        if let Some(file_meta) = file_meta {
            for key in &bundle.stored_fields {
                if fields.get(key).is_some_and(MetaValue::is_truthy) {
                    continue;
                }
                if let Some(value) = file_meta.get(key).filter(|v| v.is_truthy()) {
                    fields.insert(key.clone(), value.clone());
                }
            }
        }
    }

    ResultItem {
        id,
        score: round_score(score),
        fields,
    }
}
