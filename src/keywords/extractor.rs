//! Keyword extraction pipeline from per-page document text.

use std::any::Any;
use std::panic::{AssertUnwindSafe, UnwindSafe, catch_unwind, set_hook, take_hook};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::preprocess::{preprocess, word_count};
use super::ranker::{most_frequent, rank};
use super::tokenizer::{MIN_TOKEN_CHARS, TokenizerMode, tokenize_and_filter_with};
use super::{Diagnostic, KeywordOutcome, StopWords};

/// Default number of keywords returned per document.
pub const DEFAULT_MAX_KEYWORDS: usize = 10;

/// Default number of leading pages read from a document.
pub const DEFAULT_MAX_PAGES: usize = 10;

/// Normalized text with fewer words than this is not analyzed.
pub const MIN_DOCUMENT_WORDS: usize = 10;

/// Recovery after a failure returns at most this many keywords.
pub const RECOVERY_MAX_KEYWORDS: usize = 5;

/// Tunable limits of a [`KeywordExtractor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorSettings {
    /// Maximum number of keywords returned.
    pub max_keywords: usize,
    /// Maximum number of leading pages considered.
    pub max_pages: usize,
    /// Word splitting strategy.
    pub tokenizer: TokenizerMode,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            max_keywords: DEFAULT_MAX_KEYWORDS,
            max_pages: DEFAULT_MAX_PAGES,
            tokenizer: TokenizerMode::default(),
        }
    }
}

/// Stateless keyword extractor holding its stop-words and limits.
///
/// Safe to share across threads; every call is independent.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stop_words: Arc<StopWords>,
    settings: ExtractorSettings,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    /// Creates an extractor with the shared built-in stop-words and default
    /// settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_stop_words(StopWords::shared(), ExtractorSettings::default())
    }

    /// Creates an extractor with explicit stop-words and settings.
    #[must_use]
    pub fn with_stop_words(stop_words: Arc<StopWords>, settings: ExtractorSettings) -> Self {
        Self {
            stop_words,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ExtractorSettings {
        &self.settings
    }

    #[must_use]
    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Extracts keywords from per-page texts using the configured limits.
    #[must_use]
    pub fn extract_pages<S: AsRef<str>>(&self, page_texts: &[S]) -> KeywordOutcome {
        self.extract_pages_limited(page_texts, self.settings.max_keywords)
    }

    /// Extracts at most `max_keywords` keywords from per-page texts.
    ///
    /// Only the first `max_pages` pages are read; blank pages are skipped but
    /// still count toward that cap. Never fails: every failure resolves to a
    /// [`Diagnostic`].
    #[must_use]
    #[instrument(skip(self, page_texts), fields(pages = page_texts.len()))]
    pub fn extract_pages_limited<S: AsRef<str>>(
        &self,
        page_texts: &[S],
        max_keywords: usize,
    ) -> KeywordOutcome {
        if max_keywords == 0 {
            debug!("zero keywords requested");
            return Diagnostic::NoKeywordsRequested.into();
        }

        let text = join_pages(page_texts, self.settings.max_pages);
        if text.trim().is_empty() {
            return Diagnostic::NoTextFound.into();
        }

        let normalized = preprocess(&text);
        let words = word_count(&normalized);
        if words < MIN_DOCUMENT_WORDS {
            debug!(words, "document text below word threshold");
            return Diagnostic::TextTooShortToAnalyze.into();
        }

        self.analyze(&normalized, max_keywords)
    }

    /// Filters and ranks already normalized text, recovering from failures
    /// with a naive frequency pass.
    fn analyze(&self, normalized: &str, max_keywords: usize) -> KeywordOutcome {
        let ranked = catch_unwind_silent(AssertUnwindSafe(|| {
            #[cfg(test)]
            tests::maybe_inject_panic(tests::PanicSite::Rank);

            let tokens = tokenize_and_filter_with(normalized, &self.stop_words, self.settings.tokenizer);
            debug!(tokens = tokens.len(), "candidate tokens filtered");
            rank(&tokens, max_keywords)
        }));

        match ranked {
            Ok(outcome) => outcome,
            Err(payload) => {
                warn!(
                    detail = %panic_detail(payload.as_ref()),
                    "keyword ranking failed, attempting naive recovery"
                );
                recover_or_diagnose(normalized, max_keywords)
            }
        }
    }
}

/// Concatenates the first `max_pages` page texts with single spaces,
/// skipping blank pages.
#[must_use]
pub fn join_pages<S: AsRef<str>>(page_texts: &[S], max_pages: usize) -> String {
    page_texts
        .iter()
        .take(max_pages)
        .map(AsRef::as_ref)
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts at most `max_keywords` keywords from per-page texts with the
/// shared built-in stop-words.
///
/// Returns the list shape stored by callers: genuine keywords, or a single
/// diagnostic message. The result is never empty.
///
/// # Example
///
/// ```
/// use bookshelf_core::keywords::extract_keywords;
///
/// let keywords = extract_keywords::<&str>(&[], 10);
/// assert_eq!(keywords, vec!["no text found in document"]);
/// ```
#[must_use]
pub fn extract_keywords<S: AsRef<str>>(page_texts: &[S], max_keywords: usize) -> Vec<String> {
    KeywordExtractor::new()
        .extract_pages_limited(page_texts, max_keywords)
        .into_vec()
}

/// Last-resort keyword recovery: whitespace split, alphabetic words longer
/// than three characters, ranked by frequency.
#[must_use]
pub fn recover(text: &str, max_keywords: usize) -> KeywordOutcome {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split_whitespace()
        .filter(|word| {
            word.chars().count() > MIN_TOKEN_CHARS && word.chars().all(char::is_alphabetic)
        })
        .collect();
    if words.is_empty() {
        return Diagnostic::UnableToProcess.into();
    }

    let keywords: Vec<String> = most_frequent(&words, max_keywords.min(RECOVERY_MAX_KEYWORDS))
        .into_iter()
        .map(|(word, _)| word.to_string())
        .collect();
    if keywords.is_empty() {
        return Diagnostic::UnableToProcess.into();
    }
    KeywordOutcome::Keywords(keywords)
}

fn recover_or_diagnose(text: &str, max_keywords: usize) -> KeywordOutcome {
    catch_unwind_silent(AssertUnwindSafe(|| {
        #[cfg(test)]
        tests::maybe_inject_panic(tests::PanicSite::Recover);

        recover(text, max_keywords)
    }))
    .unwrap_or_else(|payload| {
        let detail = panic_detail(payload.as_ref());
        warn!(%detail, "keyword recovery failed");
        Diagnostic::AnalysisError(detail).into()
    })
}

// `catch_unwind` leaves the panic hook in place, which would still print a
// panic report to stderr for failures that are handled here. The hook is
// swapped out for the duration of the call; the lock keeps concurrent
// extractions from restoring each other's silent hook.
static PANIC_HOOK_LOCK: Mutex<()> = Mutex::new(());

fn catch_unwind_silent<F, T>(operation: F) -> Result<T, Box<dyn Any + Send + 'static>>
where
    F: FnOnce() -> T + UnwindSafe,
{
    let _panic_hook_guard = PANIC_HOOK_LOCK
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let previous_hook = take_hook();
    set_hook(Box::new(|_| {}));
    let outcome = catch_unwind(operation);
    set_hook(previous_hook);
    outcome
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown failure".to_string()
    }
}
