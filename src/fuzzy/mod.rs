// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Typo tolerance for query terms.

mod levenshtein;

pub use levenshtein::{bounded_distance, levenshtein_within};
