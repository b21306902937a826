// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bounded edit distance.
//!
//! Fuzzy expansion compares a query term against the whole vocabulary, and
//! nearly every comparison is a miss. Both exits below reject a miss before
//! the full table is filled:
//!
//! - length gap: `|len(a) - len(b)|` edits are needed just to even out lengths
//! - row minimum: once every cell in a row is over `max`, later rows only grow

/// Whether `a` and `b` are at most `max` edits apart.
pub fn levenshtein_within(a: &str, b: &str, max: usize) -> bool {
    bounded_distance(a, b, max).is_some()
}

/// Levenshtein distance between `a` and `b` when it is at most `max`.
pub fn bounded_distance(a: &str, b: &str, max: usize) -> Option<usize> {
    let target: Vec<char> = b.chars().collect();
    let source_len = a.chars().count();
    if source_len.abs_diff(target.len()) > max {
        return None;
    }

    let mut row: Vec<usize> = (0..=target.len()).collect();
    for (i, source_char) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        let mut row_min = row[0];

        for (j, target_char) in target.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(source_char != *target_char);
            row[j + 1] = substitution.min(above + 1).min(row[j] + 1);
            diagonal = above;
            row_min = row_min.min(row[j + 1]);
        }

        if row_min > max {
            return None;
        }
    }

    let distance = row[target.len()];
    (distance <= max).then_some(distance)
}
