//! Book catalogue persistence and keyword analysis.
//!
//! Books live in the `books` table. Keyword analysis reads the leading
//! pages of a book's PDF, runs the [`KeywordExtractor`](crate::keywords::KeywordExtractor)
//! and stores the joined result (keywords or a diagnostic placeholder) on
//! the book record.

mod analysis;
mod book;
mod error;

pub use analysis::{DocumentPages, analyze_book, read_pages};
pub use book::{
    Book, BookQuery, BookUpdate, Genre, KEYWORD_SEPARATOR, MAX_AUTHOR_CHARS, MAX_TITLE_CHARS,
    NewBook,
};
pub use error::{LibraryError, Result};

use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::{debug, instrument};

use crate::Database;

/// Repository for catalogued books.
#[derive(Debug, Clone)]
pub struct Library {
    db: Database,
}

impl Library {
    /// Creates a library backed by `db`.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns the underlying database.
    #[must_use]
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Adds a book and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::InvalidBook`] if validation fails, or
    /// [`LibraryError::Database`] if the insert fails.
    #[instrument(skip(self, book), fields(title = %book.title))]
    pub async fn add_book(&self, book: &NewBook<'_>) -> Result<i64> {
        book.validate()?;

        let row = sqlx::query(
            r"INSERT INTO books (title, author, description, year, genre, pdf_path, page_count)
              VALUES (?, ?, ?, ?, ?, ?, ?)
              RETURNING id",
        )
        .bind(book.title.trim())
        .bind(book.author.trim())
        .bind(book.description)
        .bind(book.year)
        .bind(book.genre.as_str())
        .bind(book.pdf_path)
        .bind(book.page_count)
        .fetch_one(self.db.pool())
        .await?;

        let id: i64 = row.get("id");
        debug!(id, "book added");
        Ok(id)
    }

    /// Fetches a book by ID.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] if no book has this ID.
    #[instrument(skip(self))]
    pub async fn get_book(&self, id: i64) -> Result<Book> {
        sqlx::query_as::<_, Book>(r"SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(LibraryError::NotFound(id))
    }

    /// Lists books, newest first, filtered by genre, favorite flag and a
    /// search over title, author, description and year.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn list_books(&self, query: &BookQuery) -> Result<Vec<Book>> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM books WHERE 1 = 1");
        push_filters(&mut builder, query);
        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(query.limit))
            .push(" OFFSET ")
            .push_bind(i64::from(query.offset));

        let books = builder
            .build_query_as::<Book>()
            .fetch_all(self.db.pool())
            .await?;
        Ok(books)
    }

    /// Counts books matching the filters of `query` (pagination ignored).
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn count_books(&self, query: &BookQuery) -> Result<i64> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM books WHERE 1 = 1");
        push_filters(&mut builder, query);
        let count: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    /// Applies `update` to book `id` and returns the updated record.
    ///
    /// Replacing the PDF path clears the stored keywords.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::InvalidBook`] if validation fails, or
    /// [`LibraryError::NotFound`] if no book has this ID.
    #[instrument(skip(self, update))]
    pub async fn update_book(&self, id: i64, update: &BookUpdate<'_>) -> Result<Book> {
        update.validate()?;

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE books SET updated_at = datetime('now')");
        if let Some(title) = update.title {
            builder.push(", title = ").push_bind(title.trim().to_string());
        }
        if let Some(author) = update.author {
            builder.push(", author = ").push_bind(author.trim().to_string());
        }
        if let Some(description) = update.description {
            builder.push(", description = ").push_bind(description.to_string());
        }
        if let Some(year) = update.year {
            builder.push(", year = ").push_bind(year);
        }
        if let Some(genre) = update.genre {
            builder.push(", genre = ").push_bind(genre.as_str());
        }
        if let Some(pdf_path) = update.pdf_path {
            builder
                .push(", keywords = NULL, pdf_path = ")
                .push_bind(pdf_path.to_string());
        }
        if let Some(page_count) = update.page_count {
            builder.push(", page_count = ").push_bind(page_count);
        }
        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let book = builder
            .build_query_as::<Book>()
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(LibraryError::NotFound(id))?;
        debug!(id, "book updated");
        Ok(book)
    }

    /// Flips the favorite flag of book `id` and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] if no book has this ID.
    #[instrument(skip(self))]
    pub async fn toggle_favorite(&self, id: i64) -> Result<bool> {
        let favorite = sqlx::query_scalar::<_, bool>(
            r"UPDATE books SET favorite = 1 - favorite, updated_at = datetime('now')
              WHERE id = ?
              RETURNING favorite",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or(LibraryError::NotFound(id))?;
        debug!(id, favorite, "favorite toggled");
        Ok(favorite)
    }

    /// Stores `keywords` joined with [`KEYWORD_SEPARATOR`] on the book.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] if no book has this ID.
    #[instrument(skip(self, keywords), fields(count = keywords.len()))]
    pub async fn set_keywords(&self, id: i64, keywords: &[String]) -> Result<()> {
        let joined = keywords.join(KEYWORD_SEPARATOR);
        let result = sqlx::query(
            r"UPDATE books SET keywords = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(joined)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(LibraryError::NotFound(id));
        }
        Ok(())
    }

    /// Updates the stored page count.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] if no book has this ID.
    #[instrument(skip(self))]
    pub async fn set_page_count(&self, id: i64, page_count: i64) -> Result<()> {
        let result = sqlx::query(
            r"UPDATE books SET page_count = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(page_count)
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(LibraryError::NotFound(id));
        }
        Ok(())
    }

    /// Removes a book record. The PDF file itself is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::NotFound`] if no book has this ID.
    #[instrument(skip(self))]
    pub async fn delete_book(&self, id: i64) -> Result<()> {
        let result = sqlx::query(r"DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(LibraryError::NotFound(id));
        }
        Ok(())
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &BookQuery) {
    if let Some(genre) = query.genre {
        builder.push(" AND genre = ").push_bind(genre.as_str());
    }
    if query.favorites_only {
        builder.push(" AND favorite = 1");
    }
    if let Some(search) = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let pattern = format!("%{}%", escape_like(search));
        builder.push(" AND (");
        for (i, column) in ["title", "author", "description", "CAST(year AS TEXT)"]
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                builder.push(" OR ");
            }
            builder
                .push(column)
                .push(" LIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\'");
        }
        builder.push(")");
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn library() -> Library {
        Library::new(Database::new_in_memory().await.unwrap())
    }

    fn book<'a>(title: &'a str, author: &'a str, genre: Genre) -> NewBook<'a> {
        NewBook {
            title,
            author,
            description: "",
            year: 2001,
            genre,
            pdf_path: "books/pdfs/sample.pdf",
            page_count: 12,
        }
    }

    #[tokio::test]
    async fn test_add_and_get_book() {
        let library = library().await;
        let id = library
            .add_book(&book("  Laskar Pelangi ", "Andrea Hirata", Genre::Fiksi))
            .await
            .unwrap();

        let stored = library.get_book(id).await.unwrap();
        assert_eq!(stored.title, "Laskar Pelangi");
        assert_eq!(stored.genre().unwrap(), Genre::Fiksi);
        assert_eq!(stored.page_count, 12);
        assert!(stored.keywords.is_none());
    }

    #[tokio::test]
    async fn test_add_book_rejects_invalid_fields() {
        let library = library().await;
        let result = library.add_book(&book("", "Someone", Genre::Komik)).await;
        assert!(matches!(result, Err(LibraryError::InvalidBook(_))));
    }

    #[tokio::test]
    async fn test_get_missing_book_is_not_found() {
        let library = library().await;
        let result = library.get_book(99).await;
        assert!(matches!(result, Err(LibraryError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_set_keywords_joins_list() {
        let library = library().await;
        let id = library
            .add_book(&book("Title", "Author", Genre::Motivasi))
            .await
            .unwrap();

        library
            .set_keywords(id, &["semangat".to_string(), "tujuan".to_string()])
            .await
            .unwrap();

        let stored = library.get_book(id).await.unwrap();
        assert_eq!(stored.keywords.as_deref(), Some("semangat, tujuan"));
        assert_eq!(stored.keyword_list(), vec!["semangat", "tujuan"]);
    }

    #[tokio::test]
    async fn test_updates_on_missing_book_are_not_found() {
        let library = library().await;
        assert!(matches!(
            library.set_keywords(7, &[]).await,
            Err(LibraryError::NotFound(7))
        ));
        assert!(matches!(
            library.set_page_count(7, 3).await,
            Err(LibraryError::NotFound(7))
        ));
        assert!(matches!(
            library.delete_book(7).await,
            Err(LibraryError::NotFound(7))
        ));
    }

    #[tokio::test]
    async fn test_list_books_filters_and_paginates() {
        let library = library().await;
        library
            .add_book(&book("Laskar Pelangi", "Andrea Hirata", Genre::Fiksi))
            .await
            .unwrap();
        library
            .add_book(&book("Sang Pemimpi", "Andrea Hirata", Genre::Fiksi))
            .await
            .unwrap();
        library
            .add_book(&book("Si Juki", "Faza Meonk", Genre::Komik))
            .await
            .unwrap();

        let all = library.list_books(&BookQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        // Same created_at second: newest id first.
        assert_eq!(all[0].title, "Si Juki");

        let fiction = BookQuery {
            genre: Some(Genre::Fiksi),
            ..BookQuery::default()
        };
        assert_eq!(library.list_books(&fiction).await.unwrap().len(), 2);
        assert_eq!(library.count_books(&fiction).await.unwrap(), 2);

        let search = BookQuery {
            search: Some("hirata".to_string()),
            limit: 1,
            offset: 1,
            ..BookQuery::default()
        };
        let page = library.list_books(&search).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "Laskar Pelangi");
        assert_eq!(library.count_books(&search).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let library = library().await;
        library
            .add_book(&book("Hundred Percent", "Author", Genre::Motivasi))
            .await
            .unwrap();

        let query = BookQuery {
            search: Some("%".to_string()),
            ..BookQuery::default()
        };
        assert!(library.list_books(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_description_and_year() {
        let library = library().await;
        let mut laskar = book("Laskar Pelangi", "Andrea Hirata", Genre::Fiksi);
        laskar.description = "Sekolah Muhammadiyah di Belitung";
        laskar.year = 2005;
        library.add_book(&laskar).await.unwrap();
        library
            .add_book(&book("Si Juki", "Faza Meonk", Genre::Komik))
            .await
            .unwrap();

        let by_description = BookQuery {
            search: Some("belitung".to_string()),
            ..BookQuery::default()
        };
        let found = library.list_books(&by_description).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Laskar Pelangi");

        let by_year = BookQuery {
            search: Some("2005".to_string()),
            ..BookQuery::default()
        };
        let found = library.list_books(&by_year).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].year, 2005);
        assert_eq!(library.count_books(&by_year).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_book_changes_only_given_fields() {
        let library = library().await;
        let id = library
            .add_book(&book("Laskar Pelangi", "Andrea Hirata", Genre::Fiksi))
            .await
            .unwrap();
        library
            .set_keywords(id, &["pelangi".to_string()])
            .await
            .unwrap();

        let updated = library
            .update_book(
                id,
                &BookUpdate {
                    title: Some(" Sang Pemimpi "),
                    year: Some(2006),
                    ..BookUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Sang Pemimpi");
        assert_eq!(updated.year, 2006);
        assert_eq!(updated.author, "Andrea Hirata");
        assert_eq!(updated.keywords.as_deref(), Some("pelangi"));
        assert_eq!(library.get_book(id).await.unwrap().title, "Sang Pemimpi");
    }

    #[tokio::test]
    async fn test_update_book_new_pdf_clears_keywords() {
        let library = library().await;
        let id = library
            .add_book(&book("Title", "Author", Genre::Motivasi))
            .await
            .unwrap();
        library
            .set_keywords(id, &["semangat".to_string()])
            .await
            .unwrap();

        let updated = library
            .update_book(
                id,
                &BookUpdate {
                    pdf_path: Some("books/pdfs/second.pdf"),
                    page_count: Some(80),
                    ..BookUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.pdf_path, "books/pdfs/second.pdf");
        assert_eq!(updated.page_count, 80);
        assert!(updated.keywords.is_none());
    }

    #[tokio::test]
    async fn test_update_book_errors() {
        let library = library().await;
        let change = BookUpdate {
            year: Some(1999),
            ..BookUpdate::default()
        };
        assert!(matches!(
            library.update_book(5, &change).await,
            Err(LibraryError::NotFound(5))
        ));
        assert!(matches!(
            library.update_book(5, &BookUpdate::default()).await,
            Err(LibraryError::InvalidBook(_))
        ));
    }

    #[tokio::test]
    async fn test_toggle_favorite_and_filter() {
        let library = library().await;
        let laskar = library
            .add_book(&book("Laskar Pelangi", "Andrea Hirata", Genre::Fiksi))
            .await
            .unwrap();
        library
            .add_book(&book("Si Juki", "Faza Meonk", Genre::Komik))
            .await
            .unwrap();
        assert!(!library.get_book(laskar).await.unwrap().favorite);

        assert!(library.toggle_favorite(laskar).await.unwrap());
        let favorites = BookQuery {
            favorites_only: true,
            ..BookQuery::default()
        };
        let found = library.list_books(&favorites).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, laskar);
        assert!(found[0].favorite);

        assert!(!library.toggle_favorite(laskar).await.unwrap());
        assert_eq!(library.count_books(&favorites).await.unwrap(), 0);

        assert!(matches!(
            library.toggle_favorite(42).await,
            Err(LibraryError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn test_delete_book_removes_record() {
        let library = library().await;
        let id = library
            .add_book(&book("Title", "Author", Genre::Komik))
            .await
            .unwrap();

        library.delete_book(id).await.unwrap();
        assert!(matches!(
            library.get_book(id).await,
            Err(LibraryError::NotFound(_))
        ));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like(r"50%_off\"), r"50\%\_off\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
