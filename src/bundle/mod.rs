// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The shippable bundle and its codecs.
//!
//! A bundle is built once and served as a static asset. Everything the query
//! side needs is in it:
//!
//! | Section                | Contents                                         |
//! |------------------------|--------------------------------------------------|
//! | `facets`               | Facet field names                                |
//! | `searchableFields`     | Full-text fields                                 |
//! | `storedFields`         | Fields merged into result items                  |
//! | `filesList`            | File paths; file id = position                   |
//! | `stopWords`            | Deduplicated, first-seen order                   |
//! | `index`                | Serialized engine index                          |
//! | `engineOptions`        | Options the engine was built with                |
//! | `fileIdToDocumentIds`  | File id → the engine's ids for its chunks        |
//! | `chunkMetadata`        | [`PackedTree`] of per-chunk metadata             |
//! | `fileMetadata`         | [`PackedTree`] of per-file metadata              |
//!
//! Only `index` is required; every other section defaults to empty.
//!
//! # Encodings
//!
//! Bundles are camelCase JSON. For shipping, the JSON is usually Brotli
//! compressed (`bundle.json.br`), which the dictionary-encoded trees and the
//! repetitive postings shrink well under. [`Bundle::from_bytes`] accepts
//! either: JSON always starts with `{`, a Brotli stream never does in practice.

mod unpack;

use std::io::{Read, Write};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{EngineIndex, LoadOptions};
use crate::error::{HunchError, Result};
use crate::pack::tree::PackedTree;

pub use unpack::{parent_id, Chunk, MetadataToFiles, UnpackedBundle, CONTENT_FIELD, FILE_FIELD};

/// Brotli quality used when none is specified.
pub const DEFAULT_BROTLI_QUALITY: u32 = 11;

/// Brotli window size (log2). 22 is the format's maximum for the default mode.
const BROTLI_WINDOW: u32 = 22;
const BROTLI_BUFFER: usize = 4096;

/// A packed search bundle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[serde(default)]
    pub facets: Vec<String>,
    #[serde(default)]
    pub searchable_fields: Vec<String>,
    #[serde(default)]
    pub stored_fields: Vec<String>,
    #[serde(default, alias = "files")]
    pub files_list: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_words: Option<Vec<String>>,
    pub index: EngineIndex,
    #[serde(default)]
    pub engine_options: LoadOptions,
    #[serde(default)]
    pub file_id_to_document_ids: IndexMap<usize, Vec<usize>>,
    #[serde(default)]
    pub chunk_metadata: PackedTree,
    #[serde(default)]
    pub file_metadata: PackedTree,
}

impl Bundle {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| HunchError::config(format!("bundle JSON: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to JSON and Brotli-compress it.
    pub fn to_brotli(&self, quality: u32) -> Result<Vec<u8>> {
        let json = self.to_json()?;
        let mut compressed = Vec::new();
        {
            let mut encoder = brotli::CompressorWriter::new(
                &mut compressed,
                BROTLI_BUFFER,
                quality.min(11),
                BROTLI_WINDOW,
            );
            encoder.write_all(json.as_bytes())?;
            encoder.flush()?;
        }
        debug!(
            json_bytes = json.len(),
            brotli_bytes = compressed.len(),
            quality,
            "compressed bundle"
        );
        Ok(compressed)
    }

    pub fn from_brotli(bytes: &[u8]) -> Result<Self> {
        let mut json = String::new();
        brotli::Decompressor::new(bytes, BROTLI_BUFFER)
            .read_to_string(&mut json)
            .map_err(|e| HunchError::config(format!("bundle is not valid Brotli JSON: {}", e)))?;
        Self::from_json(&json)
    }

    /// Decode a bundle that is either plain JSON or Brotli-compressed JSON.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
        if first == Some(&b'{') {
            let json = std::str::from_utf8(bytes)
                .map_err(|e| HunchError::config(format!("bundle is not UTF-8: {}", e)))?;
            Self::from_json(json)
        } else {
            Self::from_brotli(bytes)
        }
    }

    /// Restore runtime structures. Consumes the bundle; see [`UnpackedBundle`].
    pub fn unpack(self) -> Result<UnpackedBundle> {
        UnpackedBundle::from_bundle(self)
    }
}
