// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The serialized engine index and its builder.
//!
//! Documents get dense internal ("short") ids in insertion order; everything
//! else is keyed by them. The layout favors a small JSON footprint over
//! lookup speed: postings nest `term → field id → short id → frequency`, so a
//! term appearing in one field of a few documents costs a handful of bytes.
//!
//! ```text
//! documentIds          {0: "0:0", 1: "0:1", 2: "1:0"}     short id → chunk id
//! fieldIds             {"title": 0, "_content": 1}
//! fieldLength          {0: [2, 40], 1: [2, 31], ...}      terms per field
//! averageFieldLength   [2.0, 35.5]
//! storedFields         {0: {"_file": 0, "title": ...}}     storage order
//! index                {"cats": {0: {0: 1, 2: 1}}}         term → field → doc → tf
//! ```
//!
//! The postings (`index` on the wire, `terms` in Rust) are a sorted map so
//! prefix expansion is a range scan.

use std::collections::{BTreeMap, HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::terms::TermProcessor;
use crate::error::{HunchError, Result};
use crate::value::{Fields, MetaValue};

/// Postings for one term: field id → short id → term frequency.
pub type TermPostings = IndexMap<usize, IndexMap<usize, u32>>;

/// A serialized, loadable engine index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineIndex {
    #[serde(default)]
    pub document_count: usize,
    #[serde(default)]
    pub next_id: usize,
    #[serde(default)]
    pub document_ids: IndexMap<usize, String>,
    #[serde(default)]
    pub field_ids: IndexMap<String, usize>,
    #[serde(default)]
    pub field_length: IndexMap<usize, Vec<usize>>,
    #[serde(default)]
    pub average_field_length: Vec<f64>,
    #[serde(default)]
    pub stored_fields: IndexMap<usize, Fields>,
    #[serde(default, rename = "index")]
    pub terms: BTreeMap<String, TermPostings>,
}

impl EngineIndex {
    /// External id → short id.
    pub fn short_ids(&self) -> HashMap<&str, usize> {
        self.document_ids
            .iter()
            .map(|(short, external)| (external.as_str(), *short))
            .collect()
    }
}

/// Builds an [`EngineIndex`] from documents.
///
/// # Example
///
/// ```
/// use hunch::{IndexBuilder, MetaValue};
/// use indexmap::IndexMap;
///
/// let mut builder = IndexBuilder::new(["title", "_content"]);
/// let doc = IndexMap::from([
///     ("title".to_string(), MetaValue::str("Cats")),
///     ("_content".to_string(), MetaValue::str("All about cats")),
/// ]);
/// builder.add("0:0", &doc).unwrap();
/// let index = builder.finish();
///
/// assert_eq!(index.document_count, 1);
/// assert!(index.terms.contains_key("cats"));
/// ```
#[derive(Debug, Clone)]
pub struct IndexBuilder {
    fields: Vec<String>,
    store_fields: Vec<String>,
    processor: TermProcessor,
    index: EngineIndex,
    length_sums: Vec<usize>,
    seen: HashSet<String>,
}

impl IndexBuilder {
    /// Index these fields, and store them too.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let index = EngineIndex {
            field_ids: fields
                .iter()
                .enumerate()
                .map(|(id, name)| (name.clone(), id))
                .collect(),
            ..EngineIndex::default()
        };
        Self {
            store_fields: fields.clone(),
            length_sums: vec![0; fields.len()],
            fields,
            processor: TermProcessor::new(),
            index,
            seen: HashSet::new(),
        }
    }

    /// Store exactly these fields (indexed or not).
    pub fn store_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Drop these words at index time.
    pub fn stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.processor = TermProcessor::with_stop_words(words);
        self
    }

    /// Index one document. Returns its short id.
    pub fn add(&mut self, id: impl Into<String>, document: &Fields) -> Result<usize> {
        let id = id.into();
        if !self.seen.insert(id.clone()) {
            return Err(HunchError::engine(format!("duplicate document id {:?}", id)));
        }

        let short = self.index.next_id;
        self.index.next_id += 1;
        self.index.document_count += 1;
        self.index.document_ids.insert(short, id);

        let mut lengths = Vec::with_capacity(self.fields.len());
        for (field_id, field) in self.fields.iter().enumerate() {
            let text = document.get(field).map(field_text).unwrap_or_default();
            let terms = self.processor.terms(&text);
            lengths.push(terms.len());
            self.length_sums[field_id] += terms.len();

            let mut freqs: IndexMap<String, u32> = IndexMap::new();
            for term in terms {
                *freqs.entry(term).or_insert(0) += 1;
            }
            for (term, tf) in freqs {
                self.index
                    .terms
                    .entry(term)
                    .or_default()
                    .entry(field_id)
                    .or_default()
                    .insert(short, tf);
            }
        }
        self.index.field_length.insert(short, lengths);

        if !self.store_fields.is_empty() {
            let stored: Fields = self
                .store_fields
                .iter()
                .filter_map(|name| {
                    document
                        .get(name)
                        .filter(|v| !v.is_null())
                        .map(|v| (name.clone(), v.clone()))
                })
                .collect();
            self.index.stored_fields.insert(short, stored);
        }

        Ok(short)
    }

    /// Finalize: compute average field lengths.
    pub fn finish(mut self) -> EngineIndex {
        let count = self.index.document_count.max(1) as f64;
        self.index.average_field_length = self
            .length_sums
            .iter()
            .map(|sum| *sum as f64 / count)
            .collect();
        self.index
    }
}

/// Searchable text of a field value. Arrays contribute every scalar element.
fn field_text(value: &MetaValue) -> String {
    match value {
        MetaValue::Scalar(s) => s.to_string(),
        MetaValue::Array(items) => items
            .iter()
            .filter_map(MetaValue::as_scalar)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" "),
        MetaValue::Null | MetaValue::Object(_) => String::new(),
    }
}
