//! Tiered keyword ranking over filtered tokens.
//!
//! Tiers, evaluated in order:
//! 1. fewer than [`MIN_FILTERED_TOKENS`] tokens: too sparse to rank;
//! 2. fewer than [`TFIDF_MIN_TOKENS`] tokens: plain frequency ranking;
//! 3. otherwise TF-IDF over the tokens joined as one document, downgrading to
//!    repeated-token frequency ranking when the model cannot be fitted.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::tfidf::{TfidfModel, TfidfOptions};
use super::{Diagnostic, KeywordError, KeywordOutcome};

/// Below this many filtered tokens nothing is ranked.
pub const MIN_FILTERED_TOKENS: usize = 5;

/// From this many filtered tokens on, TF-IDF ranking is used.
pub const TFIDF_MIN_TOKENS: usize = 20;

/// Upper bound on the TF-IDF vocabulary.
pub const MAX_VOCABULARY: usize = 200;

/// TF-IDF weights must exceed this to count as significant.
pub const MIN_SIGNIFICANT_SCORE: f64 = 0.01;

/// Ranks `filtered_tokens` and returns at most `max_keywords` keywords, or a
/// diagnostic when the tokens do not support ranking.
#[must_use]
pub fn rank(filtered_tokens: &[String], max_keywords: usize) -> KeywordOutcome {
    rank_with(filtered_tokens, max_keywords, &TfidfOptions::default())
}

/// [`rank`] with explicit TF-IDF options. The vocabulary cap is always
/// derived from the token count and overrides `options.max_features`.
#[must_use]
pub fn rank_with(
    filtered_tokens: &[String],
    max_keywords: usize,
    options: &TfidfOptions,
) -> KeywordOutcome {
    let token_count = filtered_tokens.len();

    if token_count < MIN_FILTERED_TOKENS {
        debug!(token_count, "too few candidate tokens");
        return Diagnostic::TooShortForAnalysis.into();
    }

    let keywords: Vec<String> = if token_count < TFIDF_MIN_TOKENS {
        debug!(token_count, "small vocabulary, ranking by frequency");
        most_frequent(filtered_tokens, max_keywords)
            .into_iter()
            .map(|(token, _)| token.to_string())
            .collect()
    } else {
        match tfidf_keywords(filtered_tokens, max_keywords, options) {
            Ok(keywords) => keywords,
            Err(error) => {
                warn!(%error, "tf-idf model rejected tokens, ranking repeated tokens by frequency");
                most_frequent(filtered_tokens, max_keywords)
                    .into_iter()
                    .filter(|&(_, count)| count > 1)
                    .map(|(token, _)| token.to_string())
                    .collect()
            }
        }
    };

    if keywords.is_empty() {
        return Diagnostic::NoSignificantKeywords.into();
    }
    KeywordOutcome::Keywords(keywords)
}

/// Scores tokens with a TF-IDF model fitted on the tokens as a single
/// document, keeping significant terms only.
///
/// # Errors
/// Returns [`KeywordError::Model`] when the model cannot be fitted.
pub fn tfidf_keywords(
    filtered_tokens: &[String],
    max_keywords: usize,
    options: &TfidfOptions,
) -> Result<Vec<String>, KeywordError> {
    let document = filtered_tokens.join(" ");
    let options = TfidfOptions {
        max_features: Some(MAX_VOCABULARY.min(filtered_tokens.len())),
        ..*options
    };
    let model = TfidfModel::fit([document], &options)?;

    let keywords: Vec<String> = model
        .ranked_terms(0)
        .into_iter()
        .take(max_keywords.saturating_mul(2))
        .filter(|&(_, score)| score > MIN_SIGNIFICANT_SCORE)
        .take(max_keywords)
        .map(|(term, _)| term.to_string())
        .collect();
    debug!(
        features = model.feature_names().len(),
        selected = keywords.len(),
        "tf-idf ranking complete"
    );
    Ok(keywords)
}

/// Counts tokens and returns the `limit` most frequent ones with their
/// counts. Ties keep first-encounter order.
#[must_use]
pub fn most_frequent<S: AsRef<str>>(tokens: &[S], limit: usize) -> Vec<(&str, usize)> {
    let mut first_seen: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        let token = token.as_ref();
        let count = counts.entry(token).or_insert(0);
        if *count == 0 {
            first_seen.push(token);
        }
        *count += 1;
    }

    let mut ranked: Vec<(&str, usize)> = first_seen
        .into_iter()
        .map(|token| (token, counts.get(token).copied().unwrap_or(0)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}
