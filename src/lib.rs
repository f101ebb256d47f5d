//! Bookshelf Core Library
//!
//! This library provides the core functionality for the bookshelf tool,
//! which catalogues digitized books and extracts representative keywords
//! from their page text.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`db`] - Database connection and schema management
//! - [`document`] - Page text sources (PDF and plain text)
//! - [`keywords`] - Keyword extraction pipeline with tiered fallbacks
//! - [`library`] - Book catalogue persistence and analysis

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod db;
pub mod document;
pub mod keywords;
pub mod library;

// Re-export commonly used types
pub use db::{Database, DatabaseOptions, DbError};
pub use document::{DocumentError, PageSource, PdfDocument, PlainTextDocument, open_document};
pub use keywords::{
    Diagnostic, ExtractorSettings, KeywordError, KeywordExtractor, KeywordOutcome, StopWords,
    TokenizerMode, extract_keywords,
};
pub use library::{
    Book, BookQuery, BookUpdate, Genre, Library, LibraryError, NewBook, analyze_book,
};
