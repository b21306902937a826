// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bundle packing.
//!
//! The build step hands over everything it produced (field lists, the engine
//! index, per-chunk and per-file metadata) and [`pack`] turns it into a
//! [`Bundle`]:
//!
//! ```text
//! PackInput                              Bundle
//! ─────────                              ──────
//! facets, fields, filesList  ─────────▶  passed through
//! stopWords                  ─dedup───▶  stopWords
//! index, engineOptions       ─────────▶  index, engineOptions
//! chunkIdToFileIndex + index ─invert──▶  fileIdToDocumentIds
//! chunkMetadata              ─pack────▶  chunkMetadata  (TreePacker)
//! fileToMetadata             ─pack────▶  fileMetadata   (TreePacker, schema =
//!                                                        storedFields ∪ facets)
//! ```

pub mod tree;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bundle::Bundle;
use crate::engine::{EngineIndex, LoadOptions};
use crate::error::{HunchError, Result};
use crate::value::MetaValue;

pub use tree::{PackedTree, Skeleton, TreePacker};

/// Build output to pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackInput {
    #[serde(default)]
    pub facets: Vec<String>,
    #[serde(default)]
    pub searchable_fields: Vec<String>,
    #[serde(default)]
    pub stored_fields: Vec<String>,
    #[serde(default)]
    pub stop_words: Option<Vec<String>>,
    /// Chunk id → file id (position in `files_list`).
    #[serde(default)]
    pub chunk_id_to_file_index: IndexMap<String, usize>,
    /// Chunk id → metadata record.
    #[serde(default)]
    pub chunk_metadata: IndexMap<String, MetaValue>,
    /// File id → metadata record.
    #[serde(default)]
    pub file_to_metadata: IndexMap<String, MetaValue>,
    #[serde(default)]
    pub files_list: Vec<String>,
    pub index: EngineIndex,
    #[serde(default)]
    pub engine_options: LoadOptions,
}

/// Assemble a bundle.
///
/// Fails with a `Config` error when a chunk is unknown to the engine index or
/// points at a file outside `files_list`.
pub fn pack(input: PackInput) -> Result<Bundle> {
    let PackInput {
        facets,
        searchable_fields,
        stored_fields,
        stop_words,
        chunk_id_to_file_index,
        chunk_metadata,
        file_to_metadata,
        files_list,
        index,
        engine_options,
    } = input;

    let stop_words = stop_words.map(|words| {
        words
            .into_iter()
            .collect::<IndexSet<String>>()
            .into_iter()
            .collect::<Vec<_>>()
    });

    let mut file_id_to_document_ids: IndexMap<usize, Vec<usize>> = IndexMap::new();
    {
        let short_ids = index.short_ids();
        for (chunk_id, file_id) in &chunk_id_to_file_index {
            if *file_id >= files_list.len() {
                return Err(HunchError::config(format!(
                    "chunk {:?} points at file {} but only {} files are listed",
                    chunk_id,
                    file_id,
                    files_list.len()
                )));
            }
            let short = short_ids.get(chunk_id.as_str()).copied().ok_or_else(|| {
                HunchError::config(format!("chunk {:?} is not in the engine index", chunk_id))
            })?;
            file_id_to_document_ids.entry(*file_id).or_default().push(short);
        }
    }

    let mut chunk_packer = TreePacker::new();
    for (chunk_id, record) in &chunk_metadata {
        chunk_packer.add(chunk_id.as_str(), record);
    }
    let chunk_metadata = chunk_packer.done();

    let saved_fields: IndexSet<&String> = stored_fields.iter().chain(&facets).collect();
    let mut file_packer = TreePacker::with_schema(saved_fields.into_iter().cloned());
    for (file_id, record) in &file_to_metadata {
        file_packer.add(file_id.as_str(), record);
    }
    let file_metadata = file_packer.done();

    debug!(
        files = files_list.len(),
        documents = index.document_count,
        chunk_keys = chunk_metadata.keys.len(),
        chunk_values = chunk_metadata.values.len(),
        file_keys = file_metadata.keys.len(),
        file_values = file_metadata.values.len(),
        "packed bundle"
    );

    Ok(Bundle {
        facets,
        searchable_fields,
        stored_fields,
        files_list,
        stop_words,
        index,
        engine_options,
        file_id_to_document_ids,
        chunk_metadata,
        file_metadata,
    })
}
