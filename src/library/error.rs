//! Error types for library operations.

use thiserror::Error;

use crate::document::DocumentError;

/// Errors that can occur while cataloguing or analyzing books.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No book exists with the given ID.
    #[error("book not found: id {0}\n  Suggestion: Run `bookshelf list` to see catalogued books")]
    NotFound(i64),

    /// Book fields failed validation.
    #[error("invalid book: {0}")]
    InvalidBook(String),

    /// The book's document could not be loaded.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A background document task panicked or was cancelled.
    #[error("document worker failed: {0}")]
    Worker(String),
}

impl LibraryError {
    /// Creates an `InvalidBook` error for a field outside its allowed length.
    #[must_use]
    pub fn field_length(field: &str, max_chars: usize) -> Self {
        Self::InvalidBook(format!("{field} must be between 1 and {max_chars} characters"))
    }
}

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, LibraryError>;
