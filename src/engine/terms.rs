// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Term processing shared by indexing and querying.
//!
//! Whatever happens to a word at index time must happen to it at query time,
//! or "Café" in a page never meets "cafe" in a query. One processor, used on
//! both sides.

use std::collections::HashSet;

use crate::utils::{normalize, split_words};

/// Normalizes words into index terms and drops stop words.
#[derive(Debug, Clone, Default)]
pub struct TermProcessor {
    stop_words: HashSet<String>,
}

impl TermProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A processor that drops these words. Stop words are normalized the same
    /// way terms are, so "Über" in the list also stops "uber".
    pub fn with_stop_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: words
                .into_iter()
                .map(|w| normalize(w.as_ref()))
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Process one word. `None` means the word is not indexable.
    pub fn process(&self, word: &str) -> Option<String> {
        let term = normalize(word);
        if term.is_empty() || self.stop_words.contains(&term) {
            return None;
        }
        Some(term)
    }

    /// All terms in `text`, in order, duplicates kept.
    pub fn terms(&self, text: &str) -> Vec<String> {
        split_words(text).filter_map(|w| self.process(w)).collect()
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&normalize(word))
    }
}
