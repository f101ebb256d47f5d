//! Plain text documents with form-feed page breaks.

use std::path::Path;

use super::{DocumentError, PageSource, Result};

/// Page separator in plain text exports (`pdftotext` and friends emit it).
pub const PAGE_BREAK: char = '\x0C';

/// Plain text split into pages on [`PAGE_BREAK`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainTextDocument {
    pages: Vec<String>,
}

impl PlainTextDocument {
    /// Reads the text file at `path`.
    ///
    /// # Errors
    /// Returns [`DocumentError::Io`] if the file cannot be read.
    pub fn open(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_text(&text))
    }

    /// Splits `text` into pages. A trailing page break does not start an
    /// extra page.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.strip_suffix(PAGE_BREAK).unwrap_or(text);
        let pages = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split(PAGE_BREAK).map(str::to_string).collect()
        };
        Self { pages }
    }
}

impl PageSource for PlainTextDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_texts(&self, limit: usize) -> Vec<String> {
        self.pages.iter().take(limit).cloned().collect()
    }
}
