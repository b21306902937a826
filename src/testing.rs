// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit tests, integration tests, and benches.
//!
//! This module is always compiled but hidden from documentation.
//! It builds small but complete bundles the way a site build would.

#![doc(hidden)]

use indexmap::IndexMap;
use serde_json::{json, Value};

use crate::bundle::{Bundle, CONTENT_FIELD, FILE_FIELD};
use crate::engine::IndexBuilder;
use crate::pack::{pack, PackInput};
use crate::value::{Fields, MetaValue};

/// One file of a fixture site.
#[derive(Debug, Clone)]
pub struct FixtureFile {
    pub path: String,
    /// File metadata: an object.
    pub metadata: Value,
    /// Text of each chunk, in order.
    pub chunks: Vec<String>,
}

impl FixtureFile {
    pub fn new(path: &str, metadata: Value, chunks: &[&str]) -> Self {
        Self {
            path: path.to_string(),
            metadata,
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Field layout of a fixture site.
#[derive(Debug, Clone)]
pub struct FixtureSchema {
    pub facets: Vec<String>,
    pub searchable_fields: Vec<String>,
    pub stored_fields: Vec<String>,
    pub stop_words: Option<Vec<String>>,
}

impl Default for FixtureSchema {
    fn default() -> Self {
        Self {
            facets: vec!["tags".into(), "kind".into()],
            searchable_fields: vec!["title".into()],
            stored_fields: vec!["title".into(), "summary".into()],
            stop_words: None,
        }
    }
}

/// Convert a JSON object into a field map. Anything else becomes empty.
pub fn fields(value: Value) -> Fields {
    match MetaValue::from(value) {
        MetaValue::Object(fields) => fields,
        _ => Fields::new(),
    }
}

/// Build and pack a bundle.
///
/// Chunks are indexed over the searchable fields, the facets, and their text.
/// They store those plus `_file`, carrying the file's searchable and facet
/// metadata. File metadata keeps every stored field and facet.
pub fn build_bundle(files: &[FixtureFile], schema: &FixtureSchema) -> Bundle {
    let chunk_fields: Vec<String> = schema
        .searchable_fields
        .iter()
        .chain(&schema.facets)
        .cloned()
        .collect();
    let mut indexed = chunk_fields.clone();
    indexed.push(CONTENT_FIELD.to_string());
    let mut stored = indexed.clone();
    stored.push(FILE_FIELD.to_string());

    let mut builder = IndexBuilder::new(indexed.clone()).store_fields(stored);
    if let Some(words) = &schema.stop_words {
        builder = builder.stop_words(words);
    }

    let mut chunk_id_to_file_index = IndexMap::new();
    let mut file_to_metadata = IndexMap::new();
    for (file_id, file) in files.iter().enumerate() {
        let metadata = fields(file.metadata.clone());
        for (chunk_index, text) in file.chunks.iter().enumerate() {
            let chunk_id = format!("{}:{}", file_id, chunk_index);
            let mut document: Fields = chunk_fields
                .iter()
                .filter_map(|name| metadata.get(name).map(|v| (name.clone(), v.clone())))
                .collect();
            document.insert(FILE_FIELD.to_string(), MetaValue::from(json!(file_id)));
            document.insert(CONTENT_FIELD.to_string(), MetaValue::str(text.as_str()));
            builder
                .add(chunk_id.as_str(), &document)
                .unwrap_or_else(|e| panic!("fixture chunk {}: {}", chunk_id, e));
            chunk_id_to_file_index.insert(chunk_id, file_id);
        }
        file_to_metadata.insert(file_id.to_string(), MetaValue::Object(metadata));
    }

    let input = PackInput {
        facets: schema.facets.clone(),
        searchable_fields: schema.searchable_fields.clone(),
        stored_fields: schema.stored_fields.clone(),
        stop_words: schema.stop_words.clone(),
        chunk_id_to_file_index,
        file_to_metadata,
        files_list: files.iter().map(|f| f.path.clone()).collect(),
        engine_options: crate::engine::LoadOptions {
            fields: indexed,
            ..Default::default()
        },
        index: builder.finish(),
        ..PackInput::default()
    };
    pack(input).unwrap_or_else(|e| panic!("fixture bundle: {}", e))
}

/// The sample site: three files, one with two chunks.
///
/// | Path                | Tags           | Kind | Chunks |
/// |---------------------|----------------|------|--------|
/// | `/posts/cats.html`  | cats, pets     | post | 2      |
/// | `/posts/dogs.html`  | dogs, pets     | post | 1      |
/// | `/pages/about.html` | (none)         | page | 1      |
pub fn sample_files() -> Vec<FixtureFile> {
    vec![
        FixtureFile::new(
            "/posts/cats.html",
            json!({
                "title": "All About Cats",
                "tags": ["cats", "pets"],
                "kind": "post",
                "summary": "Everything cats"
            }),
            &["cats purr and nap all day", "more cats sleeping in the sun"],
        ),
        FixtureFile::new(
            "/posts/dogs.html",
            json!({
                "title": "Dogs",
                "tags": ["dogs", "pets"],
                "kind": "post",
                "summary": "Dogs and their people"
            }),
            &["dogs bark at cats"],
        ),
        FixtureFile::new(
            "/pages/about.html",
            json!({"title": "About", "tags": [], "kind": "page"}),
            &["about this site"],
        ),
    ]
}

pub fn sample_bundle() -> Bundle {
    build_bundle(&sample_files(), &FixtureSchema::default())
}

/// `count` single-chunk files, all tagged `tag` and all matching `"cats"`.
pub fn tagged_bundle(count: usize, tag: &str) -> Bundle {
    let files: Vec<FixtureFile> = (0..count)
        .map(|i| {
            FixtureFile::new(
                &format!("/posts/{}.html", i),
                json!({"title": format!("Post {}", i), "tags": [tag], "kind": "post"}),
                &["cats everywhere"],
            )
        })
        .collect();
    build_bundle(&files, &FixtureSchema::default())
}
