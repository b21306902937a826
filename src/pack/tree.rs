// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Packed trees: dictionary encoding for schemaless metadata.
//!
//! Maps repeated keys and values to compact indices. Tag "engineering"
//! appearing on 50 pages? Store it once, reference it by index everywhere
//! else. Same for key names: `"title"` is spelled out once per bundle, not once
//! per record. This is the dictionary-encoding trick columnar formats use,
//! applied to nested JSON instead of columns.
//!
//! Unlike a fixed dictionary per field, a packed tree has exactly two tables
//! (`keys` and `values`) shared by every record, and a *skeleton* per record
//! that mirrors its shape with indices in place of names and leaves.
//!
//! # References
//!
//! - **Dictionary Encoding**: Melnik et al. (2010), "Dremel: Interactive
//!   Analysis of Web-Scale Datasets", VLDB 2010. Apache Parquet format:
//!   <https://parquet.apache.org/docs/file-format/data-pages/encodings/>
//!
//! # Wire Format
//!
//! ```text
//! {
//!   "keys":   ["title", "tags"],            // first-seen order
//!   "values": ["Cats", "pets", "animals"],  // first-seen order
//!   "byId": {
//!     "0": { "0": 0, "1": [1, 2] }          // {title: "Cats", tags: ["pets", "animals"]}
//!   }
//! }
//! ```
//!
//! Table order is part of the format. Packing the same records in the same
//! order must produce byte-identical output, so both tables are insertion-ordered
//! hash sets (`IndexSet`): O(1) lookup, first-seen order preserved.
//!
//! # Invariants
//!
//! - Every key index in a skeleton is `< keys.len()`
//! - Every value index in a skeleton is `< values.len()`
//! - `keys` and `values` contain no duplicates
//!
//! [`PackedTree::validate`] checks all three.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{HunchError, Result};
use crate::value::{MetaValue, Scalar};

/// The shape of one record, with names and leaves replaced by table indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skeleton {
    /// A null array element. Absent object fields have no entry at all.
    Absent,
    /// Index into `values`.
    Value(usize),
    Array(Vec<Skeleton>),
    /// Key index → child. Ordered ascending, like integer keys of a JS object.
    Object(BTreeMap<usize, Skeleton>),
}

impl Serialize for Skeleton {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Skeleton::Absent => serializer.serialize_unit(),
            Skeleton::Value(idx) => serializer.serialize_u64(*idx as u64),
            Skeleton::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Skeleton::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key_idx, child) in entries {
                    map.serialize_entry(&key_idx.to_string(), child)?;
                }
                map.end()
            }
        }
    }
}

struct SkeletonVisitor;

impl<'de> Visitor<'de> for SkeletonVisitor {
    type Value = Skeleton;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a value index, an array, an object keyed by key index, or null")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Skeleton, E> {
        Ok(Skeleton::Absent)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Skeleton, E> {
        Ok(Skeleton::Absent)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Skeleton, E> {
        usize::try_from(v)
            .map(Skeleton::Value)
            .map_err(|_| E::custom(format!("value index {} out of range", v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Skeleton, E> {
        usize::try_from(v)
            .map(Skeleton::Value)
            .map_err(|_| E::custom(format!("negative value index {}", v)))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Skeleton, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Skeleton::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Skeleton, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((key, child)) = map.next_entry::<String, Skeleton>()? {
            let key_idx = key
                .parse::<usize>()
                .map_err(|_| de::Error::custom(format!("key index {:?} is not a number", key)))?;
            entries.insert(key_idx, child);
        }
        Ok(Skeleton::Object(entries))
    }
}

impl<'de> Deserialize<'de> for Skeleton {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(SkeletonVisitor)
    }
}

/// Finalized output of a [`TreePacker`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedTree {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub values: Vec<Scalar>,
    #[serde(default)]
    pub by_id: IndexMap<String, Skeleton>,
}

impl PackedTree {
    /// Number of packed records.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Decode the record stored under `id`, if any.
    pub fn get(&self, id: &str) -> Result<Option<MetaValue>> {
        self.by_id
            .get(id)
            .map(|skeleton| self.decode(skeleton))
            .transpose()
    }

    /// Rebuild a record from its skeleton.
    ///
    /// A dangling index means the bundle is corrupt, so this is a `Config`
    /// error rather than a panic.
    pub fn decode(&self, skeleton: &Skeleton) -> Result<MetaValue> {
        match skeleton {
            Skeleton::Absent => Ok(MetaValue::Null),
            Skeleton::Value(idx) => self
                .values
                .get(*idx)
                .cloned()
                .map(MetaValue::Scalar)
                .ok_or_else(|| {
                    HunchError::config(format!(
                        "value index {} out of range ({} values)",
                        idx,
                        self.values.len()
                    ))
                }),
            Skeleton::Array(items) => items
                .iter()
                .map(|item| self.decode(item))
                .collect::<Result<Vec<_>>>()
                .map(MetaValue::Array),
            Skeleton::Object(entries) => {
                let mut fields = IndexMap::with_capacity(entries.len());
                for (key_idx, child) in entries {
                    let key = self.keys.get(*key_idx).ok_or_else(|| {
                        HunchError::config(format!(
                            "key index {} out of range ({} keys)",
                            key_idx,
                            self.keys.len()
                        ))
                    })?;
                    fields.insert(key.clone(), self.decode(child)?);
                }
                Ok(MetaValue::Object(fields))
            }
        }
    }

    /// Decode every record, in packing order.
    pub fn records(&self) -> impl Iterator<Item = (&str, Result<MetaValue>)> + '_ {
        self.by_id
            .iter()
            .map(|(id, skeleton)| (id.as_str(), self.decode(skeleton)))
    }

    /// Check the table invariants: unique entries, every index in range.
    pub fn validate(&self) -> Result<()> {
        let unique_keys: IndexSet<&String> = self.keys.iter().collect();
        if unique_keys.len() != self.keys.len() {
            return Err(HunchError::config("packed tree has duplicate keys"));
        }
        let unique_values: IndexSet<&Scalar> = self.values.iter().collect();
        if unique_values.len() != self.values.len() {
            return Err(HunchError::config("packed tree has duplicate values"));
        }
        for (id, skeleton) in &self.by_id {
            self.check_indices(skeleton).map_err(|e| match e {
                HunchError::Config(msg) => HunchError::config(format!("record {:?}: {}", id, msg)),
                other => other,
            })?;
        }
        Ok(())
    }

    fn check_indices(&self, skeleton: &Skeleton) -> Result<()> {
        match skeleton {
            Skeleton::Absent => Ok(()),
            Skeleton::Value(idx) if *idx < self.values.len() => Ok(()),
            Skeleton::Value(idx) => Err(HunchError::config(format!(
                "value index {} out of range",
                idx
            ))),
            Skeleton::Array(items) => items.iter().try_for_each(|item| self.check_indices(item)),
            Skeleton::Object(entries) => entries.iter().try_for_each(|(key_idx, child)| {
                if *key_idx >= self.keys.len() {
                    return Err(HunchError::config(format!(
                        "key index {} out of range",
                        key_idx
                    )));
                }
                self.check_indices(child)
            }),
        }
    }
}

/// Incremental builder for a [`PackedTree`].
///
/// # Example
///
/// ```
/// use hunch::{MetaValue, TreePacker};
///
/// let mut packer = TreePacker::new();
/// packer.add("a", &serde_json::json!({"tags": ["x", "y"]}).into());
/// packer.add("b", &serde_json::json!({"tags": ["y"]}).into());
/// let tree = packer.done();
///
/// assert_eq!(tree.keys, vec!["tags"]);
/// assert_eq!(tree.values.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TreePacker {
    keys: IndexSet<String>,
    values: IndexSet<Scalar>,
    by_id: IndexMap<String, Skeleton>,
    /// When set, root objects are encoded through exactly these keys.
    allowed_keys: Option<Vec<String>>,
}

impl TreePacker {
    /// An empty packer; objects are encoded through their own keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// A packer for schema-fixed records.
    ///
    /// The key table is seeded with `fields` (so key indices match field
    /// order), and root objects only keep those fields. Anything else a record
    /// carries is dropped.
    pub fn with_schema<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: IndexSet<String> = fields.into_iter().map(Into::into).collect();
        let allowed = keys.iter().cloned().collect();
        Self {
            keys,
            allowed_keys: Some(allowed),
            ..Self::default()
        }
    }

    /// Encode `record` and store its skeleton under `id`.
    ///
    /// Re-adding an id replaces the skeleton; the tables keep whatever the
    /// first version interned.
    pub fn add(&mut self, id: impl Into<String>, record: &MetaValue) {
        let allowed = self.allowed_keys.take();
        let skeleton = match (record, allowed.as_deref()) {
            (MetaValue::Object(fields), Some(allowed)) => {
                let mut entries = BTreeMap::new();
                for key in allowed {
                    let key_idx = self.intern_key(key);
                    if let Some(child) = fields.get(key).and_then(|v| self.encode(v)) {
                        entries.insert(key_idx, child);
                    }
                }
                Skeleton::Object(entries)
            }
            _ => self.encode(record).unwrap_or(Skeleton::Absent),
        };
        self.allowed_keys = allowed;
        self.by_id.insert(id.into(), skeleton);
    }

    /// Recursive encode. `None` means "omit this field".
    fn encode(&mut self, value: &MetaValue) -> Option<Skeleton> {
        match value {
            MetaValue::Null => None,
            MetaValue::Scalar(scalar) => Some(Skeleton::Value(self.intern_value(scalar))),
            MetaValue::Array(items) => Some(Skeleton::Array(
                items
                    .iter()
                    .map(|item| self.encode(item).unwrap_or(Skeleton::Absent))
                    .collect(),
            )),
            MetaValue::Object(fields) => {
                let mut entries = BTreeMap::new();
                for (key, child) in fields {
                    let key_idx = self.intern_key(key);
                    if let Some(child) = self.encode(child) {
                        entries.insert(key_idx, child);
                    }
                }
                Some(Skeleton::Object(entries))
            }
        }
    }

    fn intern_key(&mut self, key: &str) -> usize {
        match self.keys.get_index_of(key) {
            Some(idx) => idx,
            None => self.keys.insert_full(key.to_string()).0,
        }
    }

    fn intern_value(&mut self, value: &Scalar) -> usize {
        match self.values.get_index_of(value) {
            Some(idx) => idx,
            None => self.values.insert_full(value.clone()).0,
        }
    }

    /// Finalize into the wire structure.
    pub fn done(self) -> PackedTree {
        PackedTree {
            keys: self.keys.into_iter().collect(),
            values: self.values.into_iter().collect(),
            by_id: self.by_id,
        }
    }
}
