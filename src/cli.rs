//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use bookshelf_core::{Genre, TokenizerMode};
use clap::{ArgGroup, Args, Parser, Subcommand};

/// Catalogue digitized books and extract their keywords.
///
/// Bookshelf keeps a small SQLite catalogue of PDF books and tags each one
/// with keywords ranked from its leading pages.
#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Catalogue database file (default: config `database` or ./bookshelf.db)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print keywords for a PDF or form-feed separated text file
    Extract(ExtractArgs),
    /// Register a book in the catalogue
    Add(AddArgs),
    /// Re-run keyword analysis for a catalogued book
    Analyze {
        /// Book ID
        id: i64,
    },
    /// List catalogued books, newest first
    List(ListArgs),
    /// Show one catalogued book
    Show {
        /// Book ID
        id: i64,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change details of a catalogued book
    Edit(EditArgs),
    /// Mark or unmark a book as favorite
    Favorite {
        /// Book ID
        id: i64,
    },
    /// Remove a book from the catalogue (the PDF is kept)
    Remove {
        /// Book ID
        id: i64,
    },
    /// Show the effective configuration
    Config,
}

/// Keyword limits shared by commands that run the extractor.
#[derive(Args, Debug, Clone, Default)]
pub struct ExtractorArgs {
    /// Maximum keywords to return (1-100)
    #[arg(short = 'k', long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub max_keywords: Option<u8>,

    /// Maximum leading pages to analyze (1-1000)
    #[arg(short = 'p', long, value_parser = clap::value_parser!(u16).range(1..=1000))]
    pub max_pages: Option<u16>,

    /// Word splitting strategy (unicode or whitespace)
    #[arg(long)]
    pub tokenizer: Option<TokenizerMode>,
}

/// Arguments for `extract`.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Input file, or `-` to read plain text from stdin
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub extractor: ExtractorArgs,

    /// Print keywords as a JSON array
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `add`.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// PDF file of the book
    #[arg(value_name = "PDF")]
    pub pdf: PathBuf,

    /// Book title (1-200 characters)
    #[arg(long)]
    pub title: String,

    /// Author name (1-100 characters)
    #[arg(long)]
    pub author: String,

    /// Publication year
    #[arg(long, allow_negative_numbers = true)]
    pub year: i64,

    /// Genre: fiksi, komik or motivasi
    #[arg(long)]
    pub genre: Genre,

    /// Short description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Skip keyword analysis
    #[arg(long)]
    pub no_analyze: bool,

    #[command(flatten)]
    pub extractor: ExtractorArgs,
}

/// Arguments for `edit`. At least one field must be given.
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("changes")
        .required(true)
        .multiple(true)
        .args(["title", "author", "year", "genre", "description", "pdf"])
))]
pub struct EditArgs {
    /// Book ID
    pub id: i64,

    /// New title (1-200 characters)
    #[arg(long)]
    pub title: Option<String>,

    /// New author name (1-100 characters)
    #[arg(long)]
    pub author: Option<String>,

    /// New publication year
    #[arg(long, allow_negative_numbers = true)]
    pub year: Option<i64>,

    /// New genre: fiksi, komik or motivasi
    #[arg(long)]
    pub genre: Option<Genre>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// Replacement PDF; its pages are recounted and old keywords cleared
    #[arg(long, value_name = "PDF")]
    pub pdf: Option<PathBuf>,
}

/// Arguments for `list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only books of this genre
    #[arg(long)]
    pub genre: Option<Genre>,

    /// Case-insensitive substring of title, author, description or year
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only books marked as favorite
    #[arg(long)]
    pub favorites: bool,

    /// Maximum rows to show (1-1000)
    #[arg(short = 'n', long, default_value_t = 12, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub limit: u32,

    /// Rows to skip
    #[arg(long, default_value_t = 0)]
    pub offset: u32,

    /// Print the rows as JSON
    #[arg(long)]
    pub json: bool,
}
