//! Text normalization ahead of tokenization.

use std::sync::LazyLock;

use regex::Regex;

/// Any character that is neither a word character nor whitespace.
static NON_WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"[^\w\s]").expect("non-word regex is valid") // Static pattern, safe to panic
});

/// Lowercases `raw_text`, replaces punctuation with spaces and collapses
/// whitespace runs into single spaces.
///
/// Total on any input; the empty string maps to the empty string.
///
/// # Example
///
/// ```
/// use bookshelf_core::keywords::preprocess;
///
/// assert_eq!(preprocess("  Hello,   World!\n"), "hello world");
/// ```
#[must_use]
pub fn preprocess(raw_text: &str) -> String {
    let lowered = raw_text.to_lowercase();
    let stripped = NON_WORD_PATTERN.replace_all(&lowered, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of whitespace separated words in `text`.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
