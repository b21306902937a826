// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query evaluation.
//!
//! A [`QueryEngine`] owns one unpacked bundle and answers queries against it.
//! Each query runs this pipeline:
//!
//! ```text
//! Query
//!   │
//!   ├─ cannot_match? ──────────────────────────▶ empty page
//!   │
//!   ├─ suggest ──▶ engine.auto_suggest ────────▶ {suggestions}
//!   ├─ q ────────▶ engine.search (+ filter)
//!   └─ neither ──▶ every stored document, score 0
//!          │
//!          ▼
//!   dedup chunks ─▶ sort hook ─▶ facet counts ─▶ page window ─▶ projection
//!                                (full set)      (slice)
//! ```
//!
//! The engine handle is loaded on the first query that needs it (listing mode
//! never does) and shared afterwards. Loading happens under a mutex so two
//! threads racing on the first query still load it once.

mod dedup;
mod facets;
mod filter;
mod page;
mod request;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::bundle::{Bundle, UnpackedBundle, CONTENT_FIELD, FILE_FIELD};
use crate::config::HunchConfig;
use crate::engine::{Combine, Engine, FilterFn, LoadOptions, MiniEngine, SearchHit, SearchOptions};
use crate::error::Result;
use crate::scoring::round_score;
use crate::value::Fields;

pub use dedup::dedup_chunks;
pub use facets::{aggregate, FacetCounts};
pub use filter::{cannot_match, facet_filter};
pub use page::{page_count, PageInfo, ResultItem, ResultPage, DEFAULT_PAGE_SIZE};
pub use request::{FacetValues, Query};

/// Reorders the de-duplicated results before paging.
pub type SortFn = dyn Fn(Vec<SearchHit>, &Query) -> Vec<SearchHit> + Send + Sync;

/// Options a [`QueryEngine`] is created with.
pub struct QueryOptions {
    /// Reorder hook, applied after de-duplication and before faceting.
    pub sort: Option<Box<SortFn>>,
    /// Query-time stop words. Overrides the bundle's list.
    pub stop_words: Option<Vec<String>>,
    /// Advisory upper bound on page sizes. Larger requests are served, and logged.
    pub max_page_size: Option<usize>,
    pub default_page_size: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            sort: None,
            stop_words: None,
            max_page_size: None,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl fmt::Debug for QueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryOptions")
            .field("sort", &self.sort.as_ref().map(|_| "<fn>"))
            .field("stop_words", &self.stop_words)
            .field("max_page_size", &self.max_page_size)
            .field("default_page_size", &self.default_page_size)
            .finish()
    }
}

impl QueryOptions {
    pub fn from_config(config: &HunchConfig) -> Self {
        Self {
            sort: None,
            stop_words: config.stop_words.clone(),
            max_page_size: config.max_page_size,
            default_page_size: config.default_page_size,
        }
    }

    pub fn with_sort<F>(mut self, sort: F) -> Self
    where
        F: Fn(Vec<SearchHit>, &Query) -> Vec<SearchHit> + Send + Sync + 'static,
    {
        self.sort = Some(Box::new(sort));
        self
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = Some(words.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_page_size(mut self, max: usize) -> Self {
        self.max_page_size = Some(max);
        self
    }
}

/// One autosuggest completion, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub q: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionList {
    pub suggestions: Vec<SuggestionItem>,
}

/// What a query returns: a result page, or suggestions in suggest mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Suggestions(SuggestionList),
    Page(ResultPage),
}

impl QueryResponse {
    pub fn as_page(&self) -> Option<&ResultPage> {
        match self {
            QueryResponse::Page(page) => Some(page),
            QueryResponse::Suggestions(_) => None,
        }
    }

    pub fn into_page(self) -> Option<ResultPage> {
        match self {
            QueryResponse::Page(page) => Some(page),
            QueryResponse::Suggestions(_) => None,
        }
    }

    pub fn into_suggestions(self) -> Option<Vec<SuggestionItem>> {
        match self {
            QueryResponse::Suggestions(list) => Some(list.suggestions),
            QueryResponse::Page(_) => None,
        }
    }
}

/// Evaluates queries against one bundle.
///
/// # Example
///
/// ```
/// use hunch::testing::sample_bundle;
/// use hunch::{Query, QueryEngine, QueryOptions};
///
/// let engine = QueryEngine::new(sample_bundle(), QueryOptions::default()).unwrap();
/// let page = engine.query(&Query::search("cats")).unwrap().into_page().unwrap();
/// assert!(!page.items.is_empty());
/// ```
pub struct QueryEngine<E: Engine = MiniEngine> {
    bundle: UnpackedBundle,
    engine: E,
    options: QueryOptions,
    load_options: LoadOptions,
    handle: Mutex<Option<Arc<E::Handle>>>,
}

impl QueryEngine<MiniEngine> {
    /// Unpack `bundle` and prepare to query it with the default engine.
    pub fn new(bundle: Bundle, options: QueryOptions) -> Result<Self> {
        Self::with_engine(bundle, MiniEngine, options)
    }

    /// Decode bundle bytes (JSON or Brotli JSON), then [`QueryEngine::new`].
    pub fn from_bytes(bytes: &[u8], options: QueryOptions) -> Result<Self> {
        Self::new(Bundle::from_bytes(bytes)?, options)
    }
}

impl<E: Engine> QueryEngine<E> {
    /// Unpack `bundle` and prepare to query it with `engine`.
    ///
    /// Fails with a `Config` error when the bundle is malformed. The engine
    /// itself is not loaded until the first query needs it.
    pub fn with_engine(bundle: Bundle, engine: E, options: QueryOptions) -> Result<Self> {
        let bundle = bundle.unpack()?;

        let fields: Vec<String> = bundle
            .searchable_fields
            .iter()
            .chain(&bundle.facets)
            .map(String::as_str)
            .chain([FILE_FIELD, CONTENT_FIELD])
            .map(str::to_string)
            .collect::<IndexSet<String>>()
            .into_iter()
            .collect();

        let stop_words = match &options.stop_words {
            Some(words) => Some(words.iter().cloned().collect()),
            None if !bundle.stop_words.is_empty() => {
                Some(bundle.stop_words.iter().cloned().collect())
            }
            None => None,
        };

        let load_options = LoadOptions {
            store_fields: fields.clone(),
            fields,
            stop_words,
        };

        debug!(
            facets = bundle.facets.len(),
            fields = load_options.fields.len(),
            default_page_size = options.default_page_size,
            "query engine ready"
        );

        Ok(Self {
            bundle,
            engine,
            options,
            load_options,
            handle: Mutex::new(None),
        })
    }

    pub fn bundle(&self) -> &UnpackedBundle {
        &self.bundle
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn max_page_size(&self) -> Option<usize> {
        self.options.max_page_size
    }

    /// Whether the engine handle has been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// The engine handle, loading it on first use.
    fn handle(&self) -> Result<Arc<E::Handle>> {
        let mut slot = self.handle.lock();
        if let Some(handle) = slot.as_ref() {
            return Ok(Arc::clone(handle));
        }
        let handle = Arc::new(self.engine.load(&self.bundle.index, &self.load_options)?);
        *slot = Some(Arc::clone(&handle));
        debug!("engine handle loaded");
        Ok(handle)
    }

    /// Parse a JSON query and evaluate it.
    pub fn query_json(&self, json: &str) -> Result<QueryResponse> {
        self.query(&Query::from_json(json)?)
    }

    /// Evaluate one query.
    pub fn query(&self, query: &Query) -> Result<QueryResponse> {
        query.validate()?;

        if cannot_match(&self.bundle.metadata_to_files, query) {
            trace!("query short-circuited: boost or facet has no matching files");
            return Ok(QueryResponse::Page(ResultPage::empty()));
        }

        let hits = if query.suggest {
            let text = query.text().unwrap_or("");
            trace!(text, "suggest mode");
            let handle = self.handle()?;
            let suggestions = self
                .engine
                .auto_suggest(&handle, text)
                .into_iter()
                .map(|s| SuggestionItem {
                    q: s.suggestion,
                    score: round_score(s.score),
                })
                .collect();
            return Ok(QueryResponse::Suggestions(SuggestionList { suggestions }));
        } else if let Some(text) = query.text() {
            trace!(text, "search mode");
            self.search(text, query)?
        } else {
            trace!("listing mode");
            self.listing()
        };

        if hits.is_empty() {
            return Ok(QueryResponse::Page(ResultPage::empty()));
        }

        let mut hits = dedup_chunks(hits);
        if let Some(sort) = &self.options.sort {
            hits = sort(hits, query);
        }

        let facets = if self.bundle.facets.is_empty() {
            None
        } else {
            Some(aggregate(&self.bundle.facets, &hits))
        };

        let size = self.page_size(query);
        let info = PageInfo::new(hits.len(), size, query.page_offset.unwrap_or(0));
        let items = page::paginate(hits, &info)
            .into_iter()
            .map(|hit| page::project(hit, &self.bundle))
            .collect();

        Ok(QueryResponse::Page(ResultPage {
            items,
            page: info,
            facets,
        }))
    }

    fn search(&self, text: &str, query: &Query) -> Result<Vec<SearchHit>> {
        let handle = self.handle()?;
        let filter = facet_filter(query);
        let filter_ref: Option<&FilterFn<'_>> = filter.as_ref().map(|f| f as &FilterFn<'_>);
        let options = SearchOptions {
            boost: query.boost.as_ref(),
            fields: query.fields.as_deref(),
            fuzzy: query.fuzzy,
            prefix: query.prefix,
            combine: Combine::Or,
            filter: filter_ref,
        };
        Ok(self.engine.search(&handle, text, &options))
    }

    /// Every stored document in storage order, score 0.
    fn listing(&self) -> Vec<SearchHit> {
        let index = &self.bundle.index;
        index
            .stored_fields
            .iter()
            .filter_map(|(short, stored): (&usize, &Fields)| {
                Some(SearchHit {
                    id: index.document_ids.get(short)?.clone(),
                    score: 0.0,
                    terms: Vec::new(),
                    matches: Default::default(),
                    stored: stored.clone(),
                })
            })
            .collect()
    }

    fn page_size(&self, query: &Query) -> usize {
        let size = match query.page_size {
            Some(size) if size >= 0 => usize::try_from(size).unwrap_or(usize::MAX),
            _ => self.options.default_page_size,
        };
        if let Some(max) = self.options.max_page_size {
            if size > max {
                warn!(size, max, "page size exceeds max_page_size");
            }
        }
        size
    }
}

impl<E: Engine> fmt::Debug for QueryEngine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryEngine")
            .field("files", &self.bundle.files_list.len())
            .field("chunks", &self.bundle.chunks.len())
            .field("options", &self.options)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
