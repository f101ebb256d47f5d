//! Word tokenization and candidate filtering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use super::StopWords;

/// Candidate tokens must be longer than this many characters.
pub const MIN_TOKEN_CHARS: usize = 3;

/// Candidate tokens must be shorter than this many characters.
pub const MAX_TOKEN_CHARS: usize = 20;

/// Strategy used to split normalized text into words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerMode {
    /// UAX #29 word boundaries, falling back to whitespace when no word is found.
    #[default]
    Unicode,
    /// Plain whitespace splitting.
    Whitespace,
}

impl TokenizerMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unicode => "unicode",
            Self::Whitespace => "whitespace",
        }
    }
}

impl fmt::Display for TokenizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenizerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unicode" => Ok(Self::Unicode),
            "whitespace" => Ok(Self::Whitespace),
            _ => Err(format!("invalid tokenizer mode: {s}")),
        }
    }
}

/// Splits `text` into lowercase word tokens.
///
/// Unicode segmentation silently degrades to whitespace splitting when it
/// finds no words in non-blank text.
#[must_use]
pub fn tokenize(text: &str, mode: TokenizerMode) -> Vec<String> {
    let lowered = text.to_lowercase();
    if mode == TokenizerMode::Unicode {
        let words: Vec<String> = lowered.unicode_words().map(str::to_string).collect();
        if !words.is_empty() || lowered.trim().is_empty() {
            return words;
        }
        debug!("unicode segmentation found no words, using whitespace split");
    }
    lowered.split_whitespace().map(str::to_string).collect()
}

/// Returns `true` if `token` is a keyword candidate.
///
/// A candidate is not a stop-word, is purely alphabetic, is not purely
/// numeric and has between 4 and 19 characters inclusive.
#[must_use]
pub fn is_candidate(token: &str, stop_words: &StopWords) -> bool {
    let chars = token.chars().count();
    !stop_words.contains(token)
        && chars > MIN_TOKEN_CHARS
        && chars < MAX_TOKEN_CHARS
        && !token.chars().all(|c| c.is_ascii_digit())
        && token.chars().all(char::is_alphabetic)
}

/// Tokenizes `text` and keeps keyword candidates in their original order.
#[must_use]
pub fn tokenize_and_filter(text: &str, stop_words: &StopWords) -> Vec<String> {
    tokenize_and_filter_with(text, stop_words, TokenizerMode::default())
}

/// Like [`tokenize_and_filter`] with an explicit tokenizer strategy.
#[must_use]
pub fn tokenize_and_filter_with(
    text: &str,
    stop_words: &StopWords,
    mode: TokenizerMode,
) -> Vec<String> {
    tokenize(text, mode)
        .into_iter()
        .filter(|token| is_candidate(token, stop_words))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_words() -> StopWords {
        StopWords::from_words(["the", "chapter", "halaman"])
    }

    #[test]
    fn test_tokenize_unicode_splits_words() {
        let tokens = tokenize("Photon lattice  electron", TokenizerMode::Unicode);
        assert_eq!(tokens, vec!["photon", "lattice", "electron"]);
    }

    #[test]
    fn test_tokenize_whitespace_mode() {
        let tokens = tokenize("alpha-beta gamma", TokenizerMode::Whitespace);
        assert_eq!(tokens, vec!["alpha-beta", "gamma"]);
    }

    #[test]
    fn test_tokenize_blank_text_is_empty() {
        assert!(tokenize("   ", TokenizerMode::Unicode).is_empty());
        assert!(tokenize("", TokenizerMode::Whitespace).is_empty());
    }

    #[test]
    fn test_tokenize_falls_back_when_segmentation_finds_nothing() {
        // Symbols are not words under UAX #29 but survive whitespace splitting.
        let tokens = tokenize("+++ ***", TokenizerMode::Unicode);
        assert_eq!(tokens, vec!["+++", "***"]);
    }

    #[test]
    fn test_filter_drops_stop_words_and_short_tokens() {
        let filtered = tokenize_and_filter("the chapter halaman cat photon", &stop_words());
        assert_eq!(filtered, vec!["photon"]);
    }

    #[test]
    fn test_filter_drops_numeric_and_mixed_tokens() {
        let filtered = tokenize_and_filter("12345 abc123 quantum 2024", &stop_words());
        assert_eq!(filtered, vec!["quantum"]);
    }

    #[test]
    fn test_filter_length_bounds() {
        let nineteen = "a".repeat(19);
        let twenty = "b".repeat(20);
        let text = format!("four {nineteen} {twenty} abc");
        let filtered = tokenize_and_filter(&text, &stop_words());
        assert_eq!(filtered, vec!["four".to_string(), nineteen]);
    }

    #[test]
    fn test_filter_counts_characters_not_bytes() {
        // Four characters, eight bytes.
        assert!(is_candidate("ärße", &stop_words()));
        assert!(!is_candidate("äöü", &stop_words()));
    }

    #[test]
    fn test_filter_preserves_order_and_duplicates() {
        let filtered = tokenize_and_filter("mango durian mango kiwi", &stop_words());
        assert_eq!(filtered, vec!["mango", "durian", "mango", "kiwi"]);
    }

    #[test]
    fn test_only_stop_words_and_short_words_yield_nothing() {
        let filtered = tokenize_and_filter("the is an", &StopWords::builtin());
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_tokenizer_mode_round_trips_through_str() {
        assert_eq!("unicode".parse::<TokenizerMode>(), Ok(TokenizerMode::Unicode));
        assert_eq!(
            TokenizerMode::Whitespace.to_string().parse::<TokenizerMode>(),
            Ok(TokenizerMode::Whitespace)
        );
        assert!("nltk".parse::<TokenizerMode>().is_err());
    }
}
