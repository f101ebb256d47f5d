//! PDF page text via `lopdf`.

use std::path::{Path, PathBuf};

use lopdf::Document;
use tracing::{debug, instrument, warn};

use super::{DocumentError, PageSource, Result};

/// A parsed PDF document.
pub struct PdfDocument {
    document: Document,
    /// Page numbers (1-based) in ascending order.
    page_numbers: Vec<u32>,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("path", &self.path)
            .field("pages", &self.page_numbers.len())
            .finish_non_exhaustive()
    }
}

impl PdfDocument {
    /// Reads and parses the PDF at `path`.
    ///
    /// # Errors
    /// Returns [`DocumentError::Io`] if the file cannot be read, or
    /// [`DocumentError::InvalidPdf`] if it does not parse.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut document = Self::parse(&bytes, Some(path))?;
        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    /// Parses a PDF held in memory.
    ///
    /// # Errors
    /// Returns [`DocumentError::InvalidPdf`] if the bytes do not parse.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::parse(bytes, None)
    }

    fn parse(bytes: &[u8], path: Option<&Path>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(DocumentError::InvalidPdf {
                path: path.map(Path::to_path_buf),
                reason: "file is empty".to_string(),
            });
        }

        let document = Document::load_mem(bytes).map_err(|e| DocumentError::InvalidPdf {
            path: path.map(Path::to_path_buf),
            reason: e.to_string(),
        })?;

        let mut page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        page_numbers.sort_unstable();
        debug!(pages = page_numbers.len(), "PDF loaded");

        Ok(Self {
            document,
            page_numbers,
            path: None,
        })
    }

    /// Source path, when loaded from disk.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_texts(&self, limit: usize) -> Vec<String> {
        self.page_numbers
            .iter()
            .take(limit)
            .map(|&page| match self.document.extract_text(&[page]) {
                Ok(text) => text,
                Err(error) => {
                    warn!(page, %error, "page text extraction failed, treating page as blank");
                    String::new()
                }
            })
            .collect()
    }
}
