// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy.
//!
//! Three failure domains, one enum. A broken bundle is a `Config` error and is
//! reported when the bundle is loaded, not on the first query that happens to
//! touch the broken part. A malformed request is a `Query` error and is caught
//! before any evaluation starts. Whatever the full-text engine refuses is an
//! `Engine` error.
//!
//! Note what is *not* here: an empty result. Queries that match nothing, or
//! that the facet short-circuit rejects, succeed with the canonical empty page.

use std::io;

use thiserror::Error;

/// Errors produced while packing, loading, or querying a bundle.
#[derive(Debug, Error)]
pub enum HunchError {
    /// The bundle is malformed (dangling file id, bad skeleton index, bad bytes).
    #[error("invalid bundle: {0}")]
    Config(String),

    /// The query has the wrong shape.
    #[error("invalid query: {0}")]
    Query(String),

    /// The full-text engine rejected its index or options.
    #[error("search engine failure: {0}")]
    Engine(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading configuration or decompressing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl HunchError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub(crate) fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    pub(crate) fn engine(message: impl Into<String>) -> Self {
        Self::Engine(message.into())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, HunchError>;
