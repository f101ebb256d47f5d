//! Keyword extraction from digitized book text.
//!
//! Page texts are concatenated, normalized, tokenized and filtered against
//! a stop-word set, then ranked with a tiered policy: too few candidates
//! yield a diagnostic, small inputs are ranked by frequency, larger ones by
//! TF-IDF weight. Failures never escape; they resolve to a
//! [`Diagnostic`] placeholder instead of keywords.
//!
//! # Example
//!
//! ```
//! use bookshelf_core::keywords::{KeywordExtractor, KeywordOutcome};
//!
//! let extractor = KeywordExtractor::new();
//! let outcome = extractor.extract_pages(&[
//!     "Volcano eruptions release magma. Magma cools into basalt.",
//!     "Basalt columns form when magma cools slowly near the volcano vent.",
//! ]);
//! assert!(matches!(outcome, KeywordOutcome::Keywords(_)));
//! ```

mod extractor;
mod outcome;
mod preprocess;
mod ranker;
mod stopwords;
mod tfidf;
mod tokenizer;

pub use extractor::{
    DEFAULT_MAX_KEYWORDS, DEFAULT_MAX_PAGES, ExtractorSettings, KeywordExtractor,
    MIN_DOCUMENT_WORDS, RECOVERY_MAX_KEYWORDS, extract_keywords, join_pages, recover,
};
pub use outcome::{Diagnostic, KeywordOutcome};
pub use preprocess::{preprocess, word_count};
pub use ranker::{
    MAX_VOCABULARY, MIN_FILTERED_TOKENS, MIN_SIGNIFICANT_SCORE, TFIDF_MIN_TOKENS, most_frequent,
    rank, rank_with, tfidf_keywords,
};
pub use stopwords::{StopWords, load_stop_words_file};
pub use tfidf::{TfidfError, TfidfModel, TfidfOptions};
pub use tokenizer::{
    MAX_TOKEN_CHARS, MIN_TOKEN_CHARS, TokenizerMode, is_candidate, tokenize, tokenize_and_filter,
    tokenize_and_filter_with,
};

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by keyword extraction helpers.
///
/// The extraction pipeline itself never returns these; they are converted
/// into fallbacks or diagnostics internally.
#[derive(Debug, Error)]
pub enum KeywordError {
    /// The TF-IDF model could not be fitted.
    #[error("keyword model failed: {0}")]
    Model(#[from] TfidfError),

    /// A custom stop-word file could not be read.
    #[error("cannot read stop-words file '{}': {source}", path.display())]
    StopWordsFile {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
