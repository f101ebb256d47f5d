//! CLI command handlers.

mod books;
mod config;
mod extract;

pub use books::{
    run_add_command, run_analyze_command, run_edit_command, run_favorite_command,
    run_list_command, run_remove_command, run_show_command,
};
pub use config::run_config_show_command;
pub use extract::run_extract_command;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bookshelf_core::keywords::load_stop_words_file;
use bookshelf_core::{Database, ExtractorSettings, KeywordExtractor, Library, StopWords};
use tracing::debug;

use crate::app_config::FileConfig;
use crate::cli::ExtractorArgs;

/// Database file used when neither `--db` nor the config names one.
pub const DEFAULT_DATABASE: &str = "bookshelf.db";

/// Settings shared by every subcommand after merging CLI flags over the
/// config file.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Catalogue database file.
    pub db_path: PathBuf,
    /// Extractor limits before per-command flags.
    pub defaults: ExtractorSettings,
    /// Stop-words, including any configured extra words.
    pub stop_words: Arc<StopWords>,
}

impl RunContext {
    /// Resolves the run context. `cli_db` wins over the config `database`.
    pub fn resolve(cli_db: Option<&Path>, config: &FileConfig) -> Result<Self> {
        let db_path = cli_db
            .map(Path::to_path_buf)
            .or_else(|| config.database.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));

        let mut defaults = ExtractorSettings::default();
        if let Some(max_keywords) = config.max_keywords {
            defaults.max_keywords = usize::from(max_keywords);
        }
        if let Some(max_pages) = config.max_pages {
            defaults.max_pages = usize::from(max_pages);
        }
        if let Some(tokenizer) = config.tokenizer {
            defaults.tokenizer = tokenizer;
        }

        let stop_words = match config.stopwords_file.as_deref() {
            Some(path) => {
                let extra = load_stop_words_file(path)
                    .context("Failed to load configured stop-words")?;
                debug!(extra = extra.len(), path = %path.display(), "custom stop-words loaded");
                Arc::new(StopWords::shared().with_extra(extra))
            }
            None => StopWords::shared(),
        };

        Ok(Self {
            db_path,
            defaults,
            stop_words,
        })
    }

    /// Extractor settings with per-command flags applied over the defaults.
    #[must_use]
    pub fn settings(&self, args: &ExtractorArgs) -> ExtractorSettings {
        ExtractorSettings {
            max_keywords: args
                .max_keywords
                .map_or(self.defaults.max_keywords, usize::from),
            max_pages: args.max_pages.map_or(self.defaults.max_pages, usize::from),
            tokenizer: args.tokenizer.unwrap_or(self.defaults.tokenizer),
        }
    }

    /// Builds an extractor for a command's flags.
    #[must_use]
    pub fn extractor(&self, args: &ExtractorArgs) -> KeywordExtractor {
        KeywordExtractor::with_stop_words(Arc::clone(&self.stop_words), self.settings(args))
    }

    /// Opens (creating if needed) the catalogue database.
    pub async fn open_library(&self) -> Result<Library> {
        let db = Database::new(&self.db_path).await.with_context(|| {
            format!("Failed to open catalogue database '{}'", self.db_path.display())
        })?;
        Ok(Library::new(db))
    }
}
