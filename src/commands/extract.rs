//! Extract command handler: print keywords for a single document.

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use bookshelf_core::library::read_pages;
use bookshelf_core::{KeywordOutcome, PageSource, PlainTextDocument};
use tracing::{info, warn};

use super::RunContext;
use crate::cli::ExtractArgs;

/// Path argument that reads plain text from stdin.
const STDIN_PATH: &str = "-";

pub async fn run_extract_command(args: &ExtractArgs, ctx: &RunContext) -> Result<()> {
    let extractor = ctx.extractor(&args.extractor);
    let max_pages = extractor.settings().max_pages;

    let page_texts = if args.input == Path::new(STDIN_PATH) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read text from stdin")?;
        PlainTextDocument::from_text(&buffer).page_texts(max_pages)
    } else {
        read_pages(args.input.clone(), max_pages)
            .await
            .with_context(|| format!("Failed to load '{}'", args.input.display()))?
            .texts
    };

    let outcome = extractor.extract_pages(&page_texts);
    match &outcome {
        KeywordOutcome::Keywords(keywords) => {
            info!(count = keywords.len(), "keywords extracted");
        }
        KeywordOutcome::Diagnostic(diagnostic) => {
            warn!(%diagnostic, "no keywords extracted");
        }
    }

    println!("{}", render_outcome(outcome, args.json)?);
    Ok(())
}

/// One keyword per line, or a JSON array. Diagnostics print as their
/// single-element list.
pub(crate) fn render_outcome(outcome: KeywordOutcome, json: bool) -> Result<String> {
    let keywords = outcome.into_vec();
    if json {
        Ok(serde_json::to_string(&keywords)?)
    } else {
        Ok(keywords.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::Diagnostic;

    #[test]
    fn test_render_outcome_lines() {
        let outcome = KeywordOutcome::Keywords(vec!["magma".into(), "basalt".into()]);
        assert_eq!(render_outcome(outcome, false).expect("render"), "magma\nbasalt");
    }

    #[test]
    fn test_render_outcome_json() {
        let outcome = KeywordOutcome::Keywords(vec!["magma".into(), "basalt".into()]);
        assert_eq!(
            render_outcome(outcome, true).expect("render"),
            r#"["magma","basalt"]"#
        );
    }

    #[test]
    fn test_render_diagnostic_as_single_entry() {
        let outcome = KeywordOutcome::from(Diagnostic::NoTextFound);
        assert_eq!(
            render_outcome(outcome.clone(), false).expect("render"),
            "no text found in document"
        );
        assert_eq!(
            render_outcome(outcome, true).expect("render"),
            r#"["no text found in document"]"#
        );
    }
}
