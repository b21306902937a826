// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bundle → runtime structures.
//!
//! Unpacking happens once per bundle, before the first query:
//!
//! 1. Stored records reference their file by id (`"_file": 3`); each gets the
//!    resolved path (`"_file": "/posts/cats.html"`).
//! 2. The stored records are flattened into a [`Chunk`] list.
//! 3. `fileIdToIndex`: file path → position in `filesList`.
//! 4. File metadata is decoded into a table indexed by file position.
//! 5. `metadataToFiles`: field → value → files carrying it. The query side
//!    uses it to reject filters that cannot match anything without running
//!    the engine at all.
//!
//! [`UnpackedBundle::from_bundle`] takes the [`Bundle`] by value. Unpacking
//! rewrites file references in place, so an unpacked bundle can't be fed
//! through again.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use super::Bundle;
use crate::engine::{EngineIndex, LoadOptions};
use crate::error::{HunchError, Result};
use crate::pack::tree::PackedTree;
use crate::value::{Fields, MetaValue, Scalar};

/// Stored field holding a chunk's file reference.
pub const FILE_FIELD: &str = "_file";
/// Stored field holding a chunk's text.
pub const CONTENT_FIELD: &str = "_content";

/// One searchable unit, as stored in the engine index.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Composite id, `"<fileId>:<chunkIndex>"`.
    pub id: String,
    pub content: MetaValue,
    /// Every other stored field, `_file` resolved to a path.
    pub fields: Fields,
}

/// Field → value → positions (in `filesList`) of files carrying that value.
pub type MetadataToFiles = IndexMap<String, IndexMap<Scalar, IndexSet<usize>>>;

/// A bundle ready to be queried.
#[derive(Debug, Clone)]
pub struct UnpackedBundle {
    pub facets: Vec<String>,
    pub searchable_fields: Vec<String>,
    pub stored_fields: Vec<String>,
    pub files_list: Vec<String>,
    pub stop_words: Vec<String>,
    /// Engine index with file references resolved.
    pub index: EngineIndex,
    pub engine_options: LoadOptions,
    pub file_id_to_document_ids: IndexMap<usize, Vec<usize>>,
    pub chunk_metadata: PackedTree,
    pub chunks: Vec<Chunk>,
    pub file_id_to_index: HashMap<String, usize>,
    /// Decoded file metadata, by file position. `None` for files without any.
    pub file_metadata: Vec<Option<Fields>>,
    pub metadata_to_files: MetadataToFiles,
}

impl UnpackedBundle {
    pub fn from_bundle(bundle: Bundle) -> Result<Self> {
        let Bundle {
            facets,
            searchable_fields,
            stored_fields,
            files_list,
            stop_words,
            mut index,
            engine_options,
            file_id_to_document_ids,
            chunk_metadata,
            file_metadata,
        } = bundle;

        resolve_file_references(&mut index, &files_list)?;
        let chunks = chunks_of(&index);

        let file_id_to_index: HashMap<String, usize> = files_list
            .iter()
            .enumerate()
            .map(|(position, path)| (path.clone(), position))
            .collect();

        let file_table = decode_file_metadata(&file_metadata, &files_list, &file_id_to_index)?;

        let mut unpacked = Self {
            facets,
            searchable_fields,
            stored_fields,
            files_list,
            stop_words: stop_words.unwrap_or_default(),
            index,
            engine_options,
            file_id_to_document_ids,
            chunk_metadata,
            chunks,
            file_id_to_index,
            file_metadata: file_table,
            metadata_to_files: MetadataToFiles::new(),
        };
        unpacked.metadata_to_files = unpacked.build_metadata_to_files()?;

        debug!(
            files = unpacked.files_list.len(),
            chunks = unpacked.chunks.len(),
            metadata_fields = unpacked.metadata_to_files.len(),
            "unpacked bundle"
        );
        Ok(unpacked)
    }

    /// File position of a path.
    pub fn file_index(&self, path: &str) -> Option<usize> {
        self.file_id_to_index.get(path).copied()
    }

    /// Decoded metadata of the file at `path`.
    pub fn file_metadata_for(&self, path: &str) -> Option<&Fields> {
        self.file_index(path)
            .and_then(|position| self.file_metadata.get(position))
            .and_then(Option::as_ref)
    }

    /// File position of a chunk id's `<fileId>` prefix, which is either a
    /// position or a path.
    pub fn file_index_of_chunk(&self, chunk_id: &str) -> Result<usize> {
        let parent = parent_id(chunk_id);
        file_position(parent, &self.files_list, &self.file_id_to_index)
    }

    fn build_metadata_to_files(&self) -> Result<MetadataToFiles> {
        let mut map = MetadataToFiles::new();

        for (position, fields) in self.file_metadata.iter().enumerate() {
            if let Some(fields) = fields {
                record_fields(&mut map, fields, position);
            }
        }

        for (chunk_id, record) in self.chunk_metadata.records() {
            if let MetaValue::Object(fields) = record? {
                let position = self.file_index_of_chunk(chunk_id)?;
                record_fields(&mut map, &fields, position);
            }
        }

        for chunk in &self.chunks {
            let by_path = chunk
                .fields
                .get(FILE_FIELD)
                .and_then(MetaValue::as_str)
                .and_then(|path| self.file_index(path));
            let position = match by_path {
                Some(position) => position,
                None => self.file_index_of_chunk(&chunk.id)?,
            };
            record_fields(&mut map, &chunk.fields, position);
            map.entry(CONTENT_FIELD.to_string()).or_default();
        }

        Ok(map)
    }
}

/// The parent (file) part of a chunk id: everything before the first `:`.
pub fn parent_id(chunk_id: &str) -> &str {
    chunk_id.split(':').next().unwrap_or(chunk_id)
}

fn file_position(
    file_id: &str,
    files_list: &[String],
    file_id_to_index: &HashMap<String, usize>,
) -> Result<usize> {
    if let Ok(position) = file_id.parse::<usize>() {
        if position < files_list.len() {
            return Ok(position);
        }
        return Err(HunchError::config(format!(
            "file id {} out of range ({} files)",
            position,
            files_list.len()
        )));
    }
    file_id_to_index
        .get(file_id)
        .copied()
        .ok_or_else(|| HunchError::config(format!("unknown file {:?}", file_id)))
}

fn resolve_file_references(index: &mut EngineIndex, files_list: &[String]) -> Result<()> {
    for (short, fields) in index.stored_fields.iter_mut() {
        let Some(file) = fields.get_mut(FILE_FIELD) else {
            continue;
        };
        let Some(file_id) = file.as_scalar().and_then(Scalar::as_i64) else {
            continue;
        };
        let path = usize::try_from(file_id)
            .ok()
            .and_then(|id| files_list.get(id))
            .ok_or_else(|| {
                HunchError::config(format!(
                    "document {} references file {} but the bundle lists {} files",
                    short,
                    file_id,
                    files_list.len()
                ))
            })?;
        *file = MetaValue::str(path.clone());
    }
    Ok(())
}

fn chunks_of(index: &EngineIndex) -> Vec<Chunk> {
    index
        .stored_fields
        .iter()
        .filter_map(|(short, stored)| {
            let id = index.document_ids.get(short)?.clone();
            let mut fields = stored.clone();
            let content = fields.shift_remove(CONTENT_FIELD).unwrap_or_default();
            Some(Chunk {
                id,
                content,
                fields,
            })
        })
        .collect()
}

fn decode_file_metadata(
    tree: &PackedTree,
    files_list: &[String],
    file_id_to_index: &HashMap<String, usize>,
) -> Result<Vec<Option<Fields>>> {
    let mut table = vec![None; files_list.len()];
    for (file_id, record) in tree.records() {
        let position = file_position(file_id, files_list, file_id_to_index)?;
        match record? {
            MetaValue::Object(fields) => table[position] = Some(fields),
            MetaValue::Null => {}
            _ => {
                return Err(HunchError::config(format!(
                    "metadata of file {:?} is not an object",
                    file_id
                )))
            }
        }
    }
    Ok(table)
}

fn record_fields(map: &mut MetadataToFiles, fields: &Fields, position: usize) {
    for (name, value) in fields {
        if name == CONTENT_FIELD {
            continue;
        }
        let values = map.entry(name.clone()).or_default();
        for scalar in value.facet_scalars() {
            values.entry(scalar.clone()).or_default().insert(position);
        }
    }
}
