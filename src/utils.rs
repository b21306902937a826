// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text helpers shared by indexing and querying.

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// Fold a word to its index form: diacritics stripped, lowercased.
///
/// "Café" and "cafe" fold to the same term, so either spelling finds the
/// other. Without the `unicode-normalization` feature only case is folded.
#[cfg(feature = "unicode-normalization")]
pub fn normalize(word: &str) -> String {
    word.nfd()
        .filter(|c| !is_diacritic(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(not(feature = "unicode-normalization"))]
pub fn normalize(word: &str) -> String {
    word.to_lowercase()
}

/// Combining marks left behind by NFD decomposition.
#[cfg(feature = "unicode-normalization")]
fn is_diacritic(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

/// Split text into words at non-alphanumeric characters.
///
/// No normalization happens here; callers run each word through their own
/// term processing so index time and query time agree.
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
}
