//! Catalogue command handlers for adding, analyzing, browsing, editing and
//! removing books.

use anyhow::{Context, Result};
use bookshelf_core::library::read_pages;
use bookshelf_core::{Book, BookQuery, BookUpdate, KeywordOutcome, NewBook, analyze_book};
use tracing::{info, warn};

use super::RunContext;
use crate::cli::{AddArgs, EditArgs, ExtractorArgs, ListArgs};

/// Keywords column shown for books that were never analyzed.
const NOT_ANALYZED: &str = "(not analyzed)";

pub async fn run_add_command(args: &AddArgs, ctx: &RunContext) -> Result<()> {
    let pdf_path = std::fs::canonicalize(&args.pdf)
        .with_context(|| format!("Cannot find book file '{}'", args.pdf.display()))?;
    let extractor = ctx.extractor(&args.extractor);
    let pages = read_pages(pdf_path.clone(), extractor.settings().max_pages)
        .await
        .with_context(|| format!("Failed to load '{}'", pdf_path.display()))?;

    let library = ctx.open_library().await?;
    let pdf_path_str = pdf_path.to_string_lossy();
    let id = library
        .add_book(&NewBook {
            title: &args.title,
            author: &args.author,
            description: &args.description,
            year: args.year,
            genre: args.genre,
            pdf_path: &pdf_path_str,
            page_count: i64::try_from(pages.page_count).unwrap_or(i64::MAX),
        })
        .await?;
    info!(id, pages = pages.page_count, "book added");
    println!("Added book {id}: {}", args.title.trim());

    if args.no_analyze {
        return Ok(());
    }

    let outcome = extractor.extract_pages(&pages.texts);
    library.set_keywords(id, &outcome.clone().into_vec()).await?;
    print_keywords(&outcome);
    Ok(())
}

pub async fn run_analyze_command(id: i64, ctx: &RunContext) -> Result<()> {
    let library = ctx.open_library().await?;
    let extractor = ctx.extractor(&ExtractorArgs::default());
    let outcome = analyze_book(&library, &extractor, id).await?;
    print_keywords(&outcome);
    Ok(())
}

pub async fn run_list_command(args: &ListArgs, ctx: &RunContext) -> Result<()> {
    let library = ctx.open_library().await?;
    let query = BookQuery {
        genre: args.genre,
        search: args.search.clone(),
        favorites_only: args.favorites,
        limit: args.limit,
        offset: args.offset,
    };
    let books = library.list_books(&query).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("No books matched the current filters.");
        return Ok(());
    }

    for book in &books {
        println!("{}", render_book_row(book));
    }
    let total = library.count_books(&query).await?;
    if i64::try_from(books.len()).unwrap_or(i64::MAX) < total {
        println!(
            "Showing {} of {total} books from offset {}; use --offset to page further.",
            books.len(),
            args.offset
        );
    }
    Ok(())
}

pub async fn run_show_command(id: i64, json: bool, ctx: &RunContext) -> Result<()> {
    let library = ctx.open_library().await?;
    let book = library.get_book(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&book)?);
    } else {
        println!("{}", render_book_detail(&book));
    }
    Ok(())
}

pub async fn run_edit_command(args: &EditArgs, ctx: &RunContext) -> Result<()> {
    let replacement = match &args.pdf {
        Some(pdf) => {
            let pdf_path = std::fs::canonicalize(pdf)
                .with_context(|| format!("Cannot find book file '{}'", pdf.display()))?;
            let pages = read_pages(pdf_path.clone(), 0)
                .await
                .with_context(|| format!("Failed to load '{}'", pdf_path.display()))?;
            Some((
                pdf_path.to_string_lossy().into_owned(),
                i64::try_from(pages.page_count).unwrap_or(i64::MAX),
            ))
        }
        None => None,
    };

    let library = ctx.open_library().await?;
    let update = BookUpdate {
        title: args.title.as_deref(),
        author: args.author.as_deref(),
        description: args.description.as_deref(),
        year: args.year,
        genre: args.genre,
        pdf_path: replacement.as_ref().map(|(path, _)| path.as_str()),
        page_count: replacement.as_ref().map(|&(_, pages)| pages),
    };
    let book = library.update_book(args.id, &update).await?;
    info!(id = book.id, pdf_replaced = replacement.is_some(), "book updated");

    println!("Updated book {}: {}", book.id, book.title);
    if replacement.is_some() {
        println!("Pages: {}", book.page_count);
        println!(
            "Keywords cleared; run `bookshelf analyze {}` to refresh them.",
            book.id
        );
    }
    Ok(())
}

pub async fn run_favorite_command(id: i64, ctx: &RunContext) -> Result<()> {
    let library = ctx.open_library().await?;
    let favorite = library.toggle_favorite(id).await?;
    if favorite {
        println!("Book {id} marked as favorite");
    } else {
        println!("Book {id} removed from favorites");
    }
    Ok(())
}

pub async fn run_remove_command(id: i64, ctx: &RunContext) -> Result<()> {
    let library = ctx.open_library().await?;
    library.delete_book(id).await?;
    info!(id, "book removed");
    println!("Removed book {id}");
    Ok(())
}

fn print_keywords(outcome: &KeywordOutcome) {
    match outcome {
        KeywordOutcome::Keywords(keywords) => println!("Keywords: {}", keywords.join(", ")),
        KeywordOutcome::Diagnostic(diagnostic) => {
            warn!(%diagnostic, "no keywords extracted");
            println!("Keywords: {diagnostic}");
        }
    }
}

fn render_book_row(book: &Book) -> String {
    let marker = if book.favorite { '*' } else { ' ' };
    format!(
        "{:>5}{marker}  {:<8}  {:>4}  {} by {}",
        book.id, book.genre_str, book.year, book.title, book.author
    )
}

fn render_book_detail(book: &Book) -> String {
    let mut lines = vec![
        format!("ID:          {}", book.id),
        format!("Title:       {}", book.title),
        format!("Author:      {}", book.author),
        format!("Year:        {}", book.year),
        format!("Genre:       {}", book.genre_str),
        format!("Pages:       {}", book.page_count),
        format!("PDF:         {}", book.pdf_path),
        format!(
            "Keywords:    {}",
            book.keywords.as_deref().unwrap_or(NOT_ANALYZED)
        ),
        format!("Favorite:    {}", if book.favorite { "yes" } else { "no" }),
        format!("Added:       {}", book.created_at),
    ];
    if !book.description.is_empty() {
        lines.push(format!("Description: {}", book.description));
    }
    lines.join("\n")
}
