// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `MiniEngine`: a small in-memory BM25+ engine.
//!
//! Each query term is expanded into the index terms it can reach:
//!
//! 1. **Exact**: the term itself, weight 1
//! 2. **Prefix**: every index term it starts (`"cat"` → `"catalog"`), via a
//!    range scan over the sorted term map
//! 3. **Fuzzy**: every index term within the edit budget (`"rsut"` → `"rust"`),
//!    via bounded Levenshtein over the vocabulary
//!
//! Every reached term is scored per field with BM25+, damped by its expansion
//! weight and multiplied by the field boost. Per-term document sets combine
//! with OR (search) or AND (autosuggest).
//!
//! Vocabularies of static sites run to a few tens of thousands of terms, so
//! the linear fuzzy scan is fine. If it ever isn't, a Levenshtein automaton
//! over the sorted terms is the next step.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::ops::Bound;

use indexmap::IndexMap;
use tracing::debug;

use super::index::EngineIndex;
use super::terms::TermProcessor;
use super::{Combine, Engine, Fuzzy, LoadOptions, SearchHit, SearchOptions, Suggestion};
use crate::error::{HunchError, Result};
use crate::fuzzy::bounded_distance;
use crate::scoring::{bm25_plus, fuzzy_weight, prefix_weight};
use crate::value::Fields;

/// The default engine. Stateless; all state lives in [`MiniHandle`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MiniEngine;

/// A loaded, validated index.
#[derive(Debug, Clone)]
pub struct MiniHandle {
    index: EngineIndex,
    /// Field names by field id.
    field_names: Vec<String>,
    /// Fields searched when a query doesn't name any.
    default_fields: Vec<usize>,
    processor: TermProcessor,
}

impl MiniHandle {
    pub fn index(&self) -> &EngineIndex {
        &self.index
    }

    pub fn document_count(&self) -> usize {
        self.index.document_count
    }
}

/// Running score of one document while a query is evaluated.
#[derive(Debug, Clone, Default)]
struct Accumulator {
    score: f64,
    terms: Vec<String>,
    matches: IndexMap<String, Vec<String>>,
}

impl Accumulator {
    fn record(&mut self, term: &str, field: &str) {
        if !self.terms.iter().any(|t| t == term) {
            self.terms.push(term.to_string());
        }
        let fields = self.matches.entry(term.to_string()).or_default();
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
    }

    fn absorb(&mut self, other: Accumulator) {
        self.score += other.score;
        for (term, fields) in other.matches {
            for field in fields {
                self.record(&term, &field);
            }
        }
    }
}

type DocScores = IndexMap<usize, Accumulator>;

impl MiniEngine {
    fn validate(index: &EngineIndex) -> Result<Vec<String>> {
        if index.document_count != index.document_ids.len() {
            return Err(HunchError::engine(format!(
                "index claims {} documents but lists {}",
                index.document_count,
                index.document_ids.len()
            )));
        }

        let field_count = index.field_ids.len();
        let mut field_names = vec![String::new(); field_count];
        for (name, id) in &index.field_ids {
            match field_names.get_mut(*id) {
                Some(slot) if slot.is_empty() => *slot = name.clone(),
                _ => {
                    return Err(HunchError::engine(format!(
                        "field {:?} has invalid or duplicate id {}",
                        name, id
                    )))
                }
            }
        }
        if index.document_count > 0 && index.average_field_length.len() < field_count {
            return Err(HunchError::engine(
                "average field lengths missing for some fields",
            ));
        }

        for (term, postings) in &index.terms {
            for (field_id, docs) in postings {
                if *field_id >= field_count {
                    return Err(HunchError::engine(format!(
                        "term {:?} references unknown field {}",
                        term, field_id
                    )));
                }
                if let Some(short) = docs.keys().find(|s| !index.document_ids.contains_key(*s)) {
                    return Err(HunchError::engine(format!(
                        "term {:?} references unknown document {}",
                        term, short
                    )));
                }
            }
        }
        Ok(field_names)
    }

    /// Evaluate a query. `prefix_last` expands only the final term by prefix
    /// (the autosuggest mode: earlier words are complete, the last is being typed).
    fn execute(
        &self,
        handle: &MiniHandle,
        text: &str,
        options: &SearchOptions<'_>,
        prefix_last: bool,
    ) -> Vec<SearchHit> {
        let query_terms = handle.processor.terms(text);
        let Some(last) = query_terms.len().checked_sub(1) else {
            return Vec::new();
        };

        let field_set: HashSet<usize> = match options.fields {
            Some(names) => names
                .iter()
                .filter_map(|name| handle.index.field_ids.get(name).copied())
                .collect(),
            None => handle.default_fields.iter().copied().collect(),
        };

        let mut combined: Option<DocScores> = None;
        for (i, term) in query_terms.iter().enumerate() {
            let prefix = options.prefix || (prefix_last && i == last);
            let scores = Self::term_scores(handle, term, prefix, options, &field_set);
            combined = Some(match combined {
                None => scores,
                Some(acc) => Self::combine(acc, scores, options.combine),
            });
        }

        let mut ranked: Vec<(usize, Accumulator)> = combined
            .unwrap_or_default()
            .into_iter()
            .collect();
        ranked.sort_by(|(a_id, a), (b_id, b)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a_id.cmp(b_id))
        });

        let empty = Fields::new();
        ranked
            .into_iter()
            .filter_map(|(short, acc)| {
                let stored = handle.index.stored_fields.get(&short).unwrap_or(&empty);
                if let Some(filter) = options.filter {
                    if !filter(stored) {
                        return None;
                    }
                }
                let id = handle.index.document_ids.get(&short)?.clone();
                Some(SearchHit {
                    id,
                    score: acc.score,
                    terms: acc.terms,
                    matches: acc.matches,
                    stored: stored.clone(),
                })
            })
            .collect()
    }

    /// Scores of every document reached by one query term.
    fn term_scores(
        handle: &MiniHandle,
        term: &str,
        prefix: bool,
        options: &SearchOptions<'_>,
        field_set: &HashSet<usize>,
    ) -> DocScores {
        let index = &handle.index;
        let term_len = term.chars().count();
        let mut reached: Vec<(&str, f64)> = Vec::new();

        if let Some((exact, _)) = index.terms.get_key_value(term) {
            reached.push((exact.as_str(), 1.0));
        }
        if prefix {
            let after = (Bound::Excluded(term), Bound::Unbounded);
            for (candidate, _) in index
                .terms
                .range::<str, _>(after)
                .take_while(|(t, _)| t.starts_with(term))
            {
                let extra = candidate.chars().count() - term_len;
                reached.push((candidate.as_str(), prefix_weight(term_len, extra)));
            }
        }
        if let Some(fuzzy) = options.fuzzy.filter(|f: &Fuzzy| f.is_enabled()) {
            let max = fuzzy.max_distance(term_len);
            if max > 0 {
                for candidate in index.terms.keys() {
                    if candidate == term || (prefix && candidate.starts_with(term)) {
                        continue;
                    }
                    if let Some(distance) = bounded_distance(term, candidate, max) {
                        reached.push((candidate.as_str(), fuzzy_weight(term_len, distance)));
                    }
                }
            }
        }

        let mut scores = DocScores::new();
        for (index_term, weight) in reached {
            let Some(postings) = index.terms.get(index_term) else {
                continue;
            };
            for (field_id, docs) in postings {
                if !field_set.contains(field_id) {
                    continue;
                }
                let field = &handle.field_names[*field_id];
                let boost = options
                    .boost
                    .and_then(|b| b.get(field))
                    .copied()
                    .unwrap_or(1.0);
                let avg_len = index
                    .average_field_length
                    .get(*field_id)
                    .copied()
                    .unwrap_or(0.0);
                for (short, tf) in docs {
                    let field_len = index
                        .field_length
                        .get(short)
                        .and_then(|lengths| lengths.get(*field_id))
                        .copied()
                        .unwrap_or(0);
                    let raw = bm25_plus(
                        f64::from(*tf),
                        docs.len(),
                        index.document_count,
                        field_len as f64,
                        avg_len,
                    );
                    let acc = scores.entry(*short).or_default();
                    acc.score += weight * boost * raw;
                    acc.record(index_term, field);
                }
            }
        }
        scores
    }

    fn combine(mut acc: DocScores, next: DocScores, combine: Combine) -> DocScores {
        match combine {
            Combine::Or => {
                for (short, scores) in next {
                    acc.entry(short).or_default().absorb(scores);
                }
                acc
            }
            Combine::And => {
                let mut next = next;
                acc.retain(|short, _| next.contains_key(short));
                for (short, existing) in &mut acc {
                    if let Some(scores) = next.swap_remove(short) {
                        existing.absorb(scores);
                    }
                }
                acc
            }
        }
    }
}

impl Engine for MiniEngine {
    type Handle = MiniHandle;

    fn load(&self, index: &EngineIndex, options: &LoadOptions) -> Result<MiniHandle> {
        let field_names = Self::validate(index)?;

        let mut default_fields: Vec<usize> = options
            .fields
            .iter()
            .filter_map(|name| index.field_ids.get(name).copied())
            .collect();
        if default_fields.is_empty() {
            default_fields = (0..field_names.len()).collect();
        }

        let processor = match &options.stop_words {
            Some(words) => TermProcessor::with_stop_words(words),
            None => TermProcessor::new(),
        };

        debug!(
            documents = index.document_count,
            terms = index.terms.len(),
            fields = field_names.len(),
            "loaded engine index"
        );

        Ok(MiniHandle {
            index: index.clone(),
            field_names,
            default_fields,
            processor,
        })
    }

    fn search(
        &self,
        handle: &MiniHandle,
        text: &str,
        options: &SearchOptions<'_>,
    ) -> Vec<SearchHit> {
        self.execute(handle, text, options, false)
    }

    fn auto_suggest(&self, handle: &MiniHandle, text: &str) -> Vec<Suggestion> {
        let options = SearchOptions {
            combine: Combine::And,
            ..SearchOptions::default()
        };

        let mut phrases: IndexMap<String, Suggestion> = IndexMap::new();
        for hit in self.execute(handle, text, &options, true) {
            let phrase = hit.terms.join(" ");
            match phrases.get_mut(&phrase) {
                Some(suggestion) => {
                    suggestion.score += hit.score;
                    suggestion.count += 1;
                }
                None => {
                    phrases.insert(
                        phrase.clone(),
                        Suggestion {
                            suggestion: phrase,
                            terms: hit.terms,
                            score: hit.score,
                            count: 1,
                        },
                    );
                }
            }
        }

        let mut suggestions: Vec<Suggestion> = phrases.into_values().collect();
        suggestions.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        suggestions
    }
}
