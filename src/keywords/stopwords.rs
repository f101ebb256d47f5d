//! Stop-word set used to discard function words before ranking.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use stop_words::{LANGUAGE, get};
use tracing::{debug, instrument};

use super::KeywordError;

/// Structural words of digitized books plus common Indonesian function and
/// number words, kept on top of the general English list.
const DOMAIN_STOP_WORDS: &[&str] = &[
    // Indonesian function words
    "dan", "di", "ke", "dari", "untuk", "dengan", "pada", "dalam", "yang", "adalah", "ini", "itu",
    "atau", "juga", "akan", "telah", "sudah", "dapat", "bisa", "tidak", "ada", "seperti",
    "karena", "sehingga", "namun",
    // Indonesian numbers one through ten
    "satu", "dua", "tiga", "empat", "lima", "enam", "tujuh", "delapan", "sembilan", "sepuluh",
    // Indonesian document structure
    "bab", "halaman", "bagian",
    // English function words
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    // English document structure
    "chapter", "page", "book", "text", "content", "section", "part",
];

static SHARED: LazyLock<Arc<StopWords>> = LazyLock::new(|| Arc::new(StopWords::builtin()));

/// Immutable set of lowercase stop-words.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// Builds the built-in set: the NLTK English list from `stop-words` plus
    /// the domain list.
    #[must_use]
    #[instrument]
    pub fn builtin() -> Self {
        let mut words: HashSet<String> = get(LANGUAGE::English)
            .iter()
            .map(|word| word.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        words.extend(DOMAIN_STOP_WORDS.iter().map(|word| (*word).to_string()));
        debug!(count = words.len(), "built-in stop-words ready");
        Self { words }
    }

    /// Process-wide built-in set, built on first use and shared afterwards.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    /// Creates a set from arbitrary words (lowercased, blanks dropped).
    #[must_use]
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        set.extend(words);
        set
    }

    /// Returns a copy of this set with extra words added.
    #[must_use]
    pub fn with_extra<I, S>(&self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = self.clone();
        set.extend(words);
        set
    }

    fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(
            words
                .into_iter()
                .map(|word| word.as_ref().trim().to_lowercase())
                .filter(|word| !word.is_empty()),
        );
    }

    /// Returns `true` if `word` is a stop-word. Expects a lowercase token.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Loads extra stop-words from a file (one word per line).
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
/// Returns [`KeywordError::StopWordsFile`] if the file cannot be read.
#[instrument]
pub fn load_stop_words_file(path: &Path) -> Result<Vec<String>, KeywordError> {
    let content = std::fs::read_to_string(path).map_err(|source| KeywordError::StopWordsFile {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_contains_english_and_domain_words() {
        let stop_words = StopWords::builtin();
        assert!(stop_words.contains("the"));
        assert!(stop_words.contains("chapter"));
        assert!(stop_words.contains("halaman"));
        assert!(stop_words.contains("sepuluh"));
        assert!(!stop_words.contains("photosynthesis"));
    }

    #[test]
    fn test_builtin_keeps_content_words() {
        let stop_words = StopWords::builtin();
        for word in ["research", "information", "system", "results", "problem", "value"] {
            assert!(!stop_words.contains(word), "{word} should be a candidate");
        }
        assert!(stop_words.contains("which"));
        assert!(!stop_words.contains(""));
        assert!(stop_words.len() < 300, "unexpected list size {}", stop_words.len());
    }

    #[test]
    fn test_shared_returns_same_instance() {
        let first = StopWords::shared();
        let second = StopWords::shared();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_with_extra_keeps_original_untouched() {
        let base = StopWords::from_words(["alpha"]);
        let extended = base.with_extra(["  Beta ", ""]);

        assert!(extended.contains("alpha"));
        assert!(extended.contains("beta"));
        assert!(!base.contains("beta"));
        assert_eq!(extended.len(), 2);
    }

    #[test]
    fn test_load_stop_words_file_skips_comments_and_blanks() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# publisher boilerplate").unwrap();
        writeln!(file, "Penerbit").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  copyright ").unwrap();

        let words = load_stop_words_file(file.path()).unwrap();
        assert_eq!(words, vec!["penerbit", "copyright"]);
    }

    #[test]
    fn test_load_stop_words_file_missing_file_errors() {
        let result = load_stop_words_file(Path::new("/nonexistent/stopwords.txt"));
        assert!(matches!(result, Err(KeywordError::StopWordsFile { .. })));
    }
}
