// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query requests.
//!
//! Queries usually arrive as JSON from a browser or an edge function, so the
//! wire shape is the contract:
//!
//! ```json
//! {
//!   "q": "cats",
//!   "facetInclude": {"tags": ["pets"]},
//!   "boost": {"title": 2},
//!   "pageSize": 10,
//!   "pageOffset": 1
//! }
//! ```
//!
//! Shape errors (a facet value list that isn't a list, a boost weight that
//! isn't a number) are caught while parsing and reported as `Query` errors,
//! before anything is evaluated.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::engine::Fuzzy;
use crate::error::{HunchError, Result};
use crate::value::Scalar;

/// Field name → values.
pub type FacetValues = IndexMap<String, Vec<Scalar>>;

/// One query against a bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Free text. Absent (or empty) means listing mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Autosuggest instead of search.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub suggest: bool,
    /// Field → score multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<IndexMap<String, f64>>,
    /// Field → values that must exist somewhere in the bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facets: Option<FacetValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet_include: Option<FacetValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet_exclude: Option<FacetValues>,
    /// Only match in these fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuzzy: Option<Fuzzy>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub prefix: bool,
    /// Negative means "use the default".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_offset: Option<usize>,
}

impl Query {
    /// A free-text search.
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            q: Some(text.into()),
            ..Self::default()
        }
    }

    /// Every document, unranked.
    pub fn listing() -> Self {
        Self::default()
    }

    /// Autosuggest completions for partially typed text.
    pub fn suggest(text: impl Into<String>) -> Self {
        Self {
            q: Some(text.into()),
            suggest: true,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let query: Self = serde_json::from_str(json).map_err(|e| HunchError::query(e.to_string()))?;
        query.validate()?;
        Ok(query)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let query: Self =
            serde_json::from_value(value).map_err(|e| HunchError::query(e.to_string()))?;
        query.validate()?;
        Ok(query)
    }

    /// Checks what the type system can't: boost weights must be finite.
    pub fn validate(&self) -> Result<()> {
        if let Some(boost) = &self.boost {
            if let Some((field, weight)) = boost.iter().find(|(_, w)| !w.is_finite()) {
                return Err(HunchError::query(format!(
                    "boost for {:?} must be a finite number, got {}",
                    field, weight
                )));
            }
        }
        Ok(())
    }

    pub fn with_page(mut self, size: i64, offset: usize) -> Self {
        self.page_size = Some(size);
        self.page_offset = Some(offset);
        self
    }

    pub fn with_page_size(mut self, size: i64) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn with_boost(mut self, field: impl Into<String>, weight: f64) -> Self {
        self.boost
            .get_or_insert_with(IndexMap::new)
            .insert(field.into(), weight);
        self
    }

    pub fn with_facet<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        insert_values(&mut self.facets, field, values);
        self
    }

    pub fn with_include<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        insert_values(&mut self.facet_include, field, values);
        self
    }

    pub fn with_exclude<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        insert_values(&mut self.facet_exclude, field, values);
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: Fuzzy) -> Self {
        self.fuzzy = Some(fuzzy);
        self
    }

    pub fn with_prefix(mut self) -> Self {
        self.prefix = true;
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// The free text, if any. Empty text counts as none.
    pub fn text(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.is_empty())
    }
}

fn insert_values<I, V>(target: &mut Option<FacetValues>, field: impl Into<String>, values: I)
where
    I: IntoIterator<Item = V>,
    V: Into<Scalar>,
{
    target
        .get_or_insert_with(IndexMap::new)
        .insert(field.into(), values.into_iter().map(Into::into).collect());
}
