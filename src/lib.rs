// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Packed, faceted search bundles for static content collections.
//!
//! A documentation site is built once and served as static files. Its search
//! index should be too: one compact asset, queried without a server. This
//! crate has both halves of that:
//!
//! - **Packing**: per-file and per-chunk metadata is dictionary-encoded into
//!   [`PackedTree`]s (every key and value stored once) and assembled, with the
//!   full-text index, into a [`Bundle`].
//! - **Querying**: a [`QueryEngine`] unpacks a bundle and answers queries with
//!   facet filtering, chunk de-duplication, facet counts, and paging.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   value.rs  │────▶│  pack/       │────▶│  bundle/     │
//! │ (MetaValue, │     │ (TreePacker, │     │ (Bundle,     │
//! │  Scalar)    │     │  pack)       │     │  unpack)     │
//! └─────────────┘     └──────────────┘     └──────────────┘
//!                                                 │
//! ┌─────────────┐                                 ▼
//! │  engine/    │◀──── load / search ────┌──────────────┐
//! │ (Engine,    │                        │  query/      │
//! │  MiniEngine)│───── ranked hits ─────▶│ (QueryEngine)│
//! └─────────────┘                        └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use hunch::testing::sample_bundle;
//! use hunch::{Query, QueryEngine, QueryOptions};
//!
//! // Bundles come from a build step; ship them as JSON or Brotli JSON.
//! let bytes = sample_bundle().to_brotli(11).unwrap();
//!
//! let engine = QueryEngine::from_bytes(&bytes, QueryOptions::default()).unwrap();
//! let page = engine
//!     .query(&Query::search("cats").with_include("tags", ["pets"]))
//!     .unwrap()
//!     .into_page()
//!     .unwrap();
//!
//! assert_eq!(page.items[0].id, "/posts/cats.html");
//! assert_eq!(page.facets.unwrap()["tags"]["pets"], 2);
//! ```

pub mod bundle;
pub mod config;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod pack;
pub mod query;
pub mod scoring;
mod utils;
pub mod value;

pub mod testing;

pub use bundle::{Bundle, Chunk, UnpackedBundle};
pub use config::HunchConfig;
pub use engine::{
    Engine, EngineIndex, Fuzzy, IndexBuilder, LoadOptions, MiniEngine, SearchHit, SearchOptions,
    Suggestion,
};
pub use error::{HunchError, Result};
pub use pack::{pack, PackInput, PackedTree, Skeleton, TreePacker};
pub use query::{
    FacetCounts, PageInfo, Query, QueryEngine, QueryOptions, QueryResponse, ResultItem,
    ResultPage, SuggestionItem,
};
pub use utils::normalize;
pub use value::{Fields, MetaValue, Scalar};
