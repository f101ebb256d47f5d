//! Book record types.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::LibraryError;

/// Maximum characters in a book title.
pub const MAX_TITLE_CHARS: usize = 200;

/// Maximum characters in an author name.
pub const MAX_AUTHOR_CHARS: usize = 100;

/// Separator used when storing keyword lists in a single text column.
pub const KEYWORD_SEPARATOR: &str = ", ";

/// Catalogue genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    /// Fiction.
    Fiksi,
    /// Comics.
    Komik,
    /// Self-help and motivation.
    Motivasi,
}

impl Genre {
    /// Returns the database string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fiksi => "fiksi",
            Self::Komik => "komik",
            Self::Motivasi => "motivasi",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fiksi" => Ok(Self::Fiksi),
            "komik" => Ok(Self::Komik),
            "motivasi" => Ok(Self::Motivasi),
            _ => Err(format!("invalid genre: {s} (expected fiksi, komik or motivasi)")),
        }
    }
}

/// A catalogued book.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: String,
    pub year: i64,
    /// Genre as stored (parse via `genre()`).
    #[sqlx(rename = "genre")]
    #[serde(rename = "genre")]
    pub genre_str: String,
    /// Location of the source PDF.
    pub pdf_path: String,
    pub page_count: i64,
    /// Keyword list joined with [`KEYWORD_SEPARATOR`], if analyzed.
    pub keywords: Option<String>,
    pub favorite: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Book {
    /// Parses the stored genre.
    ///
    /// # Errors
    /// Returns an error string if the stored value is not a known genre.
    pub fn genre(&self) -> Result<Genre, String> {
        self.genre_str.parse()
    }

    /// Splits the stored keywords back into a list. Empty when not analyzed.
    #[must_use]
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .as_deref()
            .filter(|joined| !joined.is_empty())
            .map(|joined| joined.split(KEYWORD_SEPARATOR).map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Fields required to add a book.
#[derive(Debug, Clone)]
pub struct NewBook<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub description: &'a str,
    pub year: i64,
    pub genre: Genre,
    pub pdf_path: &'a str,
    pub page_count: i64,
}

impl NewBook<'_> {
    /// Checks field lengths against the catalogue limits.
    ///
    /// # Errors
    /// Returns [`LibraryError::InvalidBook`] naming the offending field.
    pub fn validate(&self) -> Result<(), LibraryError> {
        check_title(self.title)?;
        check_author(self.author)?;
        check_page_count(self.page_count)?;
        check_pdf_path(self.pdf_path)
    }
}

/// Field changes for an existing book. `None` leaves a field unchanged.
///
/// Setting `pdf_path` clears the stored keywords, which described the
/// previous document.
#[derive(Debug, Clone, Default)]
pub struct BookUpdate<'a> {
    pub title: Option<&'a str>,
    pub author: Option<&'a str>,
    pub description: Option<&'a str>,
    pub year: Option<i64>,
    pub genre: Option<Genre>,
    pub pdf_path: Option<&'a str>,
    pub page_count: Option<i64>,
}

impl BookUpdate<'_> {
    /// Returns `true` when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.description.is_none()
            && self.year.is_none()
            && self.genre.is_none()
            && self.pdf_path.is_none()
            && self.page_count.is_none()
    }

    /// Checks the provided fields against the catalogue limits.
    ///
    /// # Errors
    /// Returns [`LibraryError::InvalidBook`] naming the offending field, or
    /// when nothing would change.
    pub fn validate(&self) -> Result<(), LibraryError> {
        if self.is_empty() {
            return Err(LibraryError::InvalidBook("nothing to update".to_string()));
        }
        if let Some(title) = self.title {
            check_title(title)?;
        }
        if let Some(author) = self.author {
            check_author(author)?;
        }
        if let Some(page_count) = self.page_count {
            check_page_count(page_count)?;
        }
        if let Some(pdf_path) = self.pdf_path {
            check_pdf_path(pdf_path)?;
        }
        Ok(())
    }
}

fn check_title(title: &str) -> Result<(), LibraryError> {
    let chars = title.trim().chars().count();
    if chars == 0 || chars > MAX_TITLE_CHARS {
        return Err(LibraryError::field_length("title", MAX_TITLE_CHARS));
    }
    Ok(())
}

fn check_author(author: &str) -> Result<(), LibraryError> {
    let chars = author.trim().chars().count();
    if chars == 0 || chars > MAX_AUTHOR_CHARS {
        return Err(LibraryError::field_length("author", MAX_AUTHOR_CHARS));
    }
    Ok(())
}

fn check_page_count(page_count: i64) -> Result<(), LibraryError> {
    if page_count < 0 {
        return Err(LibraryError::InvalidBook(
            "page count cannot be negative".to_string(),
        ));
    }
    Ok(())
}

fn check_pdf_path(pdf_path: &str) -> Result<(), LibraryError> {
    if pdf_path.trim().is_empty() {
        return Err(LibraryError::InvalidBook("PDF path is required".to_string()));
    }
    Ok(())
}

/// Filters and pagination for listing books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookQuery {
    /// Only books of this genre.
    pub genre: Option<Genre>,
    /// Case-insensitive substring of title, author, description or year.
    pub search: Option<String>,
    /// Only books marked as favorite.
    pub favorites_only: bool,
    pub limit: u32,
    pub offset: u32,
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            genre: None,
            search: None,
            favorites_only: false,
            limit: 12,
            offset: 0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_book<'a>(title: &'a str, author: &'a str) -> NewBook<'a> {
        NewBook {
            title,
            author,
            description: "",
            year: 1938,
            genre: Genre::Fiksi,
            pdf_path: "books/pdfs/tenggelamnya.pdf",
            page_count: 0,
        }
    }

    #[test]
    fn test_genre_round_trips_through_str() {
        for genre in [Genre::Fiksi, Genre::Komik, Genre::Motivasi] {
            assert_eq!(genre.to_string().parse::<Genre>().unwrap(), genre);
        }
        assert!("horror".parse::<Genre>().is_err());
    }

    #[test]
    fn test_keyword_list_splits_stored_keywords() {
        let book = Book {
            id: 1,
            title: "Title".into(),
            author: "Author".into(),
            description: String::new(),
            year: 2020,
            genre_str: "komik".into(),
            pdf_path: "a.pdf".into(),
            page_count: 3,
            keywords: Some("volcano, magma, basalt".into()),
            favorite: false,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(book.keyword_list(), vec!["volcano", "magma", "basalt"]);
        assert_eq!(book.genre().unwrap(), Genre::Komik);

        let unanalyzed = Book {
            keywords: None,
            ..book.clone()
        };
        assert!(unanalyzed.keyword_list().is_empty());
    }

    #[test]
    fn test_validate_accepts_reasonable_book() {
        assert!(new_book("Tenggelamnya Kapal", "Hamka").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_and_long_fields() {
        assert!(new_book("  ", "Hamka").validate().is_err());
        assert!(new_book("Title", "").validate().is_err());

        let long_title = "x".repeat(MAX_TITLE_CHARS + 1);
        let err = new_book(&long_title, "Hamka").validate().unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_update_validates_only_provided_fields() {
        let update = BookUpdate {
            year: Some(1981),
            ..BookUpdate::default()
        };
        assert!(update.validate().is_ok());

        let blank_title = BookUpdate {
            title: Some("  "),
            ..BookUpdate::default()
        };
        let err = blank_title.validate().unwrap_err();
        assert!(err.to_string().contains("title"));

        let blank_pdf = BookUpdate {
            pdf_path: Some(""),
            ..BookUpdate::default()
        };
        assert!(blank_pdf.validate().is_err());
    }

    #[test]
    fn test_empty_update_is_rejected() {
        assert!(BookUpdate::default().is_empty());
        let err = BookUpdate::default().validate().unwrap_err();
        assert!(err.to_string().contains("nothing to update"));
    }

    #[test]
    fn test_validate_rejects_negative_page_count() {
        let mut book = new_book("Title", "Author");
        book.page_count = -1;
        assert!(book.validate().is_err());
    }
}
