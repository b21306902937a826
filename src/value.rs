// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Metadata values: the closed set of shapes a record can take.
//!
//! Bundles are JSON on the wire, and the metadata inside them has no schema.
//! A page might carry `{"tags": ["rust", "wasm"], "draft": false}`, another
//! `{"author": {"name": "..."}}`. Rather than branch on untyped JSON at every
//! call site, everything goes through [`MetaValue`]: object, array, scalar, or
//! null. The packer recurses over exactly these four cases.
//!
//! # Equality and presence
//!
//! Two rules come from the browser side of the house, where bundles are
//! queried from JavaScript and results must agree:
//!
//! - **Scalar equality is strict.** `1` and `1.0` are the same value (JSON has
//!   one number type), `"1"` and `1` are not. Integral floats are normalized to
//!   [`Scalar::Int`] at construction so derived `Hash`/`Eq` stay consistent.
//! - **Presence is truthiness.** A field "is present" unless it is null,
//!   `false`, `0`, or `""`. Empty arrays and objects are present.

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A leaf value: what ends up in a packed tree's `values` table.
#[derive(Debug, Clone)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Build a numeric scalar, folding integral floats into `Int`.
    pub fn from_f64(value: f64) -> Self {
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            Scalar::Int(value as i64)
        } else {
            Scalar::Float(value)
        }
    }

    /// JavaScript truthiness.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Int(i) => *i != 0,
            Scalar::Float(f) => *f != 0.0 && !f.is_nan(),
            Scalar::Str(s) => !s.is_empty(),
        }
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a.to_bits() == b.to_bits(),
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Scalar::Bool(b) => b.hash(state),
            Scalar::Int(i) => i.hash(state),
            Scalar::Float(f) => f.to_bits().hash(state),
            Scalar::Str(s) => s.hash(state),
        }
    }
}

/// Facet buckets are keyed by the scalar's string form, like JS object keys.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::from_f64(f)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::Str(s) => serializer.serialize_str(s),
        }
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, or boolean")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
        Ok(Scalar::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
        Ok(Scalar::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
        Ok(i64::try_from(v).map_or(Scalar::Float(v as f64), Scalar::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
        Ok(Scalar::from_f64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
        Ok(Scalar::Str(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
        Ok(Scalar::Str(v))
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// A metadata value of any shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MetaValue {
    /// JSON `null`, or a field that was never there.
    #[default]
    Null,
    Scalar(Scalar),
    Array(Vec<MetaValue>),
    /// Keys keep their insertion order; the packer's key table depends on it.
    Object(IndexMap<String, MetaValue>),
}

/// A flat record: field name → value, in insertion order.
pub type Fields = IndexMap<String, MetaValue>;

impl MetaValue {
    /// Convenience constructor for string values.
    pub fn str(s: impl Into<String>) -> Self {
        MetaValue::Scalar(Scalar::Str(s.into()))
    }

    /// JavaScript truthiness (see module docs).
    pub fn is_truthy(&self) -> bool {
        match self {
            MetaValue::Null => false,
            MetaValue::Scalar(s) => s.is_truthy(),
            MetaValue::Array(_) | MetaValue::Object(_) => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MetaValue::Null)
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            MetaValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    pub fn as_array(&self) -> Option<&[MetaValue]> {
        match self {
            MetaValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            MetaValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Does this value "hold" `needle`?
    ///
    /// Arrays hold any element equal to it; scalars hold only themselves.
    /// This is the one comparison facet filters use.
    pub fn holds(&self, needle: &Scalar) -> bool {
        match self {
            MetaValue::Array(items) => items
                .iter()
                .any(|item| item.as_scalar().is_some_and(|s| s == needle)),
            MetaValue::Scalar(s) => s == needle,
            _ => false,
        }
    }

    /// The scalars this value contributes to facet counts and lookup maps:
    /// each scalar element of an array, or the scalar itself.
    pub fn facet_scalars(&self) -> Vec<&Scalar> {
        match self {
            MetaValue::Array(items) => items.iter().filter_map(MetaValue::as_scalar).collect(),
            MetaValue::Scalar(s) => vec![s],
            _ => Vec::new(),
        }
    }
}

impl From<Scalar> for MetaValue {
    fn from(s: Scalar) -> Self {
        MetaValue::Scalar(s)
    }
}

impl From<serde_json::Value> for MetaValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => MetaValue::Null,
            Value::Bool(b) => MetaValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => MetaValue::Scalar(match n.as_i64() {
                Some(i) => Scalar::Int(i),
                None => Scalar::from_f64(n.as_f64().unwrap_or(f64::NAN)),
            }),
            Value::String(s) => MetaValue::Scalar(Scalar::Str(s)),
            Value::Array(items) => MetaValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                MetaValue::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl Serialize for MetaValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetaValue::Null => serializer.serialize_unit(),
            MetaValue::Scalar(s) => s.serialize(serializer),
            MetaValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            MetaValue::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

struct MetaValueVisitor;

impl<'de> Visitor<'de> for MetaValueVisitor {
    type Value = MetaValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<MetaValue, E> {
        Ok(MetaValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<MetaValue, E> {
        Ok(MetaValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<MetaValue, D::Error> {
        MetaValue::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<MetaValue, E> {
        ScalarVisitor.visit_bool(v).map(MetaValue::Scalar)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<MetaValue, E> {
        ScalarVisitor.visit_i64(v).map(MetaValue::Scalar)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<MetaValue, E> {
        ScalarVisitor.visit_u64(v).map(MetaValue::Scalar)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<MetaValue, E> {
        ScalarVisitor.visit_f64(v).map(MetaValue::Scalar)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<MetaValue, E> {
        ScalarVisitor.visit_str(v).map(MetaValue::Scalar)
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<MetaValue, E> {
        ScalarVisitor.visit_string(v).map(MetaValue::Scalar)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<MetaValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(MetaValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<MetaValue, A::Error> {
        let mut fields = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, MetaValue>()? {
            fields.insert(key, value);
        }
        Ok(MetaValue::Object(fields))
    }
}

impl<'de> Deserialize<'de> for MetaValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MetaValueVisitor)
    }
}
