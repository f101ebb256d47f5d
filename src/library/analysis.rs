//! Keyword analysis of catalogued books.

use std::path::PathBuf;

use tracing::{info, instrument};

use super::{Library, LibraryError, Result};
use crate::document::open_document;
use crate::keywords::{KeywordExtractor, KeywordOutcome};

/// Leading page texts of a document together with its total page count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPages {
    /// Total number of pages in the document.
    pub page_count: usize,
    /// Text of at most `max_pages` leading pages.
    pub texts: Vec<String>,
}

/// Loads a document off the async runtime and returns its leading pages.
///
/// # Errors
///
/// Returns [`LibraryError::Document`] if the document cannot be loaded.
#[instrument(skip(path), fields(path = %path.display()))]
pub async fn read_pages(path: PathBuf, max_pages: usize) -> Result<DocumentPages> {
    tokio::task::spawn_blocking(move || -> Result<DocumentPages> {
        let document = open_document(&path)?;
        Ok(DocumentPages {
            page_count: document.page_count(),
            texts: document.page_texts(max_pages),
        })
    })
    .await
    .map_err(|e| LibraryError::Worker(e.to_string()))?
}

/// Extracts keywords for book `id` from its PDF and stores them on the
/// record, refreshing the stored page count as well.
///
/// Diagnostics are stored exactly like keywords.
///
/// # Errors
///
/// Returns [`LibraryError::NotFound`] for an unknown book,
/// [`LibraryError::Document`] if its PDF cannot be loaded, or
/// [`LibraryError::Database`] if the update fails.
#[instrument(skip(library, extractor))]
pub async fn analyze_book(
    library: &Library,
    extractor: &KeywordExtractor,
    id: i64,
) -> Result<KeywordOutcome> {
    let book = library.get_book(id).await?;
    let pages = read_pages(PathBuf::from(&book.pdf_path), extractor.settings().max_pages).await?;

    let outcome = extractor.extract_pages(&pages.texts);
    library.set_keywords(id, &outcome.clone().into_vec()).await?;

    let page_count = i64::try_from(pages.page_count).unwrap_or(i64::MAX);
    if page_count != book.page_count {
        library.set_page_count(id, page_count).await?;
    }

    info!(
        id,
        diagnostic = outcome.is_diagnostic(),
        keywords = %outcome.joined(),
        "book analyzed"
    );
    Ok(outcome)
}
