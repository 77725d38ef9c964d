//! Word and line matching over document text.
//!
//! Words are maximal runs of alphanumeric characters and `_`; everything
//! else separates them. A query matches a word when both are equal after
//! Unicode lowercasing, so matching is whole-word, case-insensitive and
//! never overlapping.

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
}

/// Number of times `word` occurs in `text`.
pub fn count_word(text: &str, word: &str) -> u64 {
    let needle = word.to_lowercase();
    if needle.is_empty() {
        return 0;
    }
    words(text)
        .filter(|candidate| candidate.to_lowercase() == needle)
        .count() as u64
}

/// Whether `word` occurs at least once in `text`.
pub fn contains_word(text: &str, word: &str) -> bool {
    let needle = word.to_lowercase();
    !needle.is_empty() && words(text).any(|candidate| candidate.to_lowercase() == needle)
}

/// Number of lines in `text`; a trailing newline does not start a new line.
pub fn count_lines(text: &str) -> u64 {
    text.lines().count() as u64
}
