//! Page text sources feeding keyword extraction.
//!
//! A [`PageSource`] hands out the text of a document page by page, in page
//! order. PDF files are read with `lopdf`; plain text files are split into
//! pages on form feed characters.

mod pdf;
mod text;

pub use pdf::PdfDocument;
pub use text::{PAGE_BREAK, PlainTextDocument};

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::instrument;

/// Errors raised while loading a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("cannot read document '{}': {source}", path.display())]
    Io {
        /// Path of the document.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a readable PDF.
    #[error("invalid PDF{}: {reason}", source_label(.path.as_deref()))]
    InvalidPdf {
        /// Path of the document, when loaded from disk.
        path: Option<PathBuf>,
        /// Parser message.
        reason: String,
    },
}

fn source_label(path: Option<&Path>) -> String {
    path.map(|p| format!(" '{}'", p.display()))
        .unwrap_or_default()
}

/// Result alias for document loading.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Ordered per-page text of a loaded document.
pub trait PageSource {
    /// Total number of pages.
    fn page_count(&self) -> usize;

    /// Text of the first `limit` pages in page order. Pages whose text
    /// cannot be extracted are returned as empty strings.
    fn page_texts(&self, limit: usize) -> Vec<String>;
}

/// Opens `path` as a PDF when it has a `.pdf` extension, otherwise as plain
/// text.
///
/// # Errors
/// Returns [`DocumentError`] if the file cannot be read or parsed.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn open_document(path: &Path) -> Result<Box<dyn PageSource>> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        Ok(Box::new(PdfDocument::open(path)?))
    } else {
        Ok(Box::new(PlainTextDocument::open(path)?))
    }
}
