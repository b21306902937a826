// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind search ranking.
//!
//! Relevance is BM25+ per field, summed across fields and query terms. A term
//! that only matched by prefix or by typo tolerance contributes a damped
//! score, so "cat" still ranks a page about cats above a page about catalogs.
//!
//! # Constants
//!
//! | Constant        | Value | Why this value |
//! |-----------------|-------|----------------|
//! | `BM25_K`        | 1.2   | Term frequency saturation: the 5th "rust" adds little |
//! | `BM25_B`        | 0.7   | Length normalization: long pages don't win by volume |
//! | `BM25_D`        | 0.5   | BM25+ floor: any match beats no match, even on huge pages |
//! | `PREFIX_WEIGHT` | 0.375 | Prefix hits rank below exact hits of similar quality |
//! | `FUZZY_WEIGHT`  | 0.45  | Typo hits rank below exact, above long prefix stretches |
//!
//! Result scores handed to callers are rounded to three decimals
//! ([`round_score`]) so identical bundles produce identical JSON everywhere.

/// BM25 term frequency saturation.
pub const BM25_K: f64 = 1.2;

/// BM25 length normalization strength.
pub const BM25_B: f64 = 0.7;

/// BM25+ lower bound on the term frequency component.
pub const BM25_D: f64 = 0.5;

/// Weight of a term reached by prefix expansion.
pub const PREFIX_WEIGHT: f64 = 0.375;

/// Weight of a term reached by fuzzy expansion.
pub const FUZZY_WEIGHT: f64 = 0.45;

/// How much each extra prefix character counts against a prefix match.
pub const PREFIX_DISTANCE_FACTOR: f64 = 0.3;

/// Fuzziness used when a query asks for `fuzzy: true`.
pub const DEFAULT_FUZZINESS: f64 = 0.2;

/// Upper bound on edit distance for fractional fuzziness.
pub const MAX_FUZZY_DISTANCE: usize = 6;

/// BM25+ score of one term in one field of one document.
///
/// - `term_freq`: occurrences of the term in this field
/// - `matching_docs`: documents containing the term in this field
/// - `total_docs`: documents in the index
/// - `field_len` / `avg_field_len`: this field's length vs the corpus average
pub fn bm25_plus(
    term_freq: f64,
    matching_docs: usize,
    total_docs: usize,
    field_len: f64,
    avg_field_len: f64,
) -> f64 {
    let matching = matching_docs as f64;
    let inv_doc_freq = (1.0 + (total_docs as f64 - matching + 0.5) / (matching + 0.5)).ln();
    let length_ratio = if avg_field_len > 0.0 {
        field_len / avg_field_len
    } else {
        1.0
    };
    inv_doc_freq
        * (BM25_D
            + term_freq * (BM25_K + 1.0)
                / (term_freq + BM25_K * (1.0 - BM25_B + BM25_B * length_ratio)))
}

/// Weight of an index term reached from a query term by prefix expansion.
///
/// `extra_chars` is how many characters the index term adds to the query term.
pub fn prefix_weight(query_len: usize, extra_chars: usize) -> f64 {
    let len = query_len as f64;
    PREFIX_WEIGHT * len / (len + PREFIX_DISTANCE_FACTOR * extra_chars as f64)
}

/// Weight of an index term reached by fuzzy expansion at edit `distance`.
pub fn fuzzy_weight(query_len: usize, distance: usize) -> f64 {
    let len = query_len as f64;
    FUZZY_WEIGHT * len / (len + distance as f64)
}

/// Round to three decimals, half away from zero.
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
