// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The full-text engine seam.
//!
//! Everything that understands *text* (tokenizing, the inverted index,
//! ranking, prefix and typo expansion, autosuggest) lives behind [`Engine`].
//! The query pipeline never looks inside: it hands the engine a query string
//! and options, and post-processes whatever ranked hits come back.
//!
//! [`MiniEngine`] is the engine bundles are built for by default. Anything
//! that can load an [`EngineIndex`] and return score-descending hits can take
//! its place.
//!
//! ```text
//! ┌──────────────┐  load(index, options)  ┌──────────────┐
//! │ QueryEngine  │───────────────────────▶│    Engine    │
//! │ (query/)     │  search / auto_suggest │ (MiniEngine) │
//! │              │◀───────────────────────│              │
//! └──────────────┘     Vec<SearchHit>     └──────────────┘
//! ```

mod index;
mod mini;
mod terms;

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scoring::{DEFAULT_FUZZINESS, MAX_FUZZY_DISTANCE};
use crate::value::Fields;

pub use index::{EngineIndex, IndexBuilder};
pub use mini::{MiniEngine, MiniHandle};
pub use terms::TermProcessor;

/// A full-text search capability.
pub trait Engine {
    /// Loaded, query-ready state for one index.
    type Handle;

    /// Turn a serialized index into a handle. Fails on a corrupt index.
    fn load(&self, index: &EngineIndex, options: &LoadOptions) -> Result<Self::Handle>;

    /// Ranked hits for `text`, best first.
    fn search(&self, handle: &Self::Handle, text: &str, options: &SearchOptions<'_>)
        -> Vec<SearchHit>;

    /// Ranked completions for partially typed `text`, best first.
    fn auto_suggest(&self, handle: &Self::Handle, text: &str) -> Vec<Suggestion>;
}

/// Options an engine is loaded with.
///
/// Bundles carry these verbatim (`engineOptions`); the query engine fills in
/// `fields`/`storeFields` from the bundle's field lists and attaches runtime
/// stop words before loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOptions {
    /// Fields searched when a query doesn't restrict them.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Fields whose values are kept with each document.
    #[serde(default)]
    pub store_fields: Vec<String>,
    /// Terms dropped from queries.
    #[serde(skip)]
    pub stop_words: Option<HashSet<String>>,
}

/// Typo tolerance requested by a query.
///
/// `true` means the default fuzziness. A number below 1 is a fraction of the
/// term length; 1 or more is an absolute edit distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fuzzy {
    Enabled(bool),
    Distance(f64),
}

impl Fuzzy {
    /// Whether the query actually asked for fuzziness (`false` and `0` don't).
    pub fn is_enabled(self) -> bool {
        match self {
            Fuzzy::Enabled(on) => on,
            Fuzzy::Distance(d) => d > 0.0,
        }
    }

    /// Maximum edit distance for a term of `term_len` characters.
    pub fn max_distance(self, term_len: usize) -> usize {
        let fuzziness = match self {
            Fuzzy::Enabled(false) => return 0,
            Fuzzy::Enabled(true) => DEFAULT_FUZZINESS,
            Fuzzy::Distance(d) if d <= 0.0 => return 0,
            Fuzzy::Distance(d) => d,
        };
        if fuzziness < 1.0 {
            MAX_FUZZY_DISTANCE.min((term_len as f64 * fuzziness).round() as usize)
        } else {
            fuzziness as usize
        }
    }
}

/// How per-term matches combine into document matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combine {
    /// A document matches if any term matches.
    #[default]
    Or,
    /// A document matches only if every term matches.
    And,
}

/// Predicate over a document's stored fields.
pub type FilterFn<'a> = dyn Fn(&Fields) -> bool + 'a;

/// Per-search options.
#[derive(Default)]
pub struct SearchOptions<'a> {
    /// Field name → score multiplier.
    pub boost: Option<&'a IndexMap<String, f64>>,
    /// Only match in these fields.
    pub fields: Option<&'a [String]>,
    pub fuzzy: Option<Fuzzy>,
    /// Expand every query term by prefix.
    pub prefix: bool,
    pub combine: Combine,
    /// Drop documents whose stored fields fail this predicate.
    pub filter: Option<&'a FilterFn<'a>>,
}

/// One ranked document.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// External document id (a chunk id such as `"3:0"`).
    pub id: String,
    pub score: f64,
    /// Index terms that matched, in first-match order.
    pub terms: Vec<String>,
    /// Index term → fields it matched in.
    pub matches: IndexMap<String, Vec<String>>,
    /// The document's stored fields.
    pub stored: Fields,
}

/// One autosuggest completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// The completed phrase.
    pub suggestion: String,
    pub terms: Vec<String>,
    /// Summed score of all documents matching the phrase.
    pub score: f64,
    /// How many documents contributed.
    pub count: usize,
}
