//! Term-frequency / inverse-document-frequency model over whitespace
//! separated documents.
//!
//! Weights follow the usual smoothed formulation:
//! `idf(t) = ln((1 + n) / (1 + df(t))) + 1`, raw term counts, and each
//! document row normalized to unit L2 length. For a single-document corpus
//! every `idf` equals `1`, so the scores reduce to normalized term counts.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::{debug, instrument};

/// Errors raised while fitting a [`TfidfModel`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TfidfError {
    /// The corpus contains no documents.
    #[error("corpus contains no documents")]
    NoDocuments,

    /// No term survived tokenization and document-frequency pruning.
    #[error("empty vocabulary: documents contain no usable terms")]
    EmptyVocabulary,

    /// `max_df` resolves to fewer documents than `min_df`.
    #[error("max_df ({max_docs} documents) is lower than min_df ({min_docs} documents)")]
    InvalidBounds {
        /// Document count allowed by `max_df`.
        max_docs: usize,
        /// Document count required by `min_df`.
        min_docs: usize,
    },

    /// A weight came out as NaN or infinite.
    #[error("non-finite weight computed for term '{term}'")]
    NonFiniteScore {
        /// Offending term.
        term: String,
    },
}

/// Vectorizer options.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfOptions {
    /// Keep only this many terms, highest corpus frequency first.
    pub max_features: Option<usize>,
    /// Minimum number of documents a term must appear in.
    pub min_df: usize,
    /// Maximum proportion of documents a term may appear in.
    pub max_df: f64,
    /// Terms shorter than this many characters are ignored.
    pub min_term_chars: usize,
}

impl Default for TfidfOptions {
    fn default() -> Self {
        Self {
            max_features: None,
            min_df: 1,
            max_df: 1.0,
            min_term_chars: 2,
        }
    }
}

/// Fitted model: an alphabetical vocabulary and one weight row per document.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    vocabulary: Vec<String>,
    idf: Vec<f64>,
    rows: Vec<Vec<f64>>,
}

impl TfidfModel {
    /// Fits the model on `documents`.
    ///
    /// # Errors
    /// See [`TfidfError`].
    #[instrument(skip(documents))]
    pub fn fit<I, S>(documents: I, options: &TfidfOptions) -> Result<Self, TfidfError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let counts: Vec<HashMap<String, usize>> = documents
            .into_iter()
            .map(|doc| count_terms(doc.as_ref(), options.min_term_chars))
            .collect();
        if counts.is_empty() {
            return Err(TfidfError::NoDocuments);
        }

        let n_docs = counts.len();
        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        let mut corpus_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in &counts {
            for (term, count) in doc {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
                *corpus_frequency.entry(term.as_str()).or_insert(0) += count;
            }
        }
        if document_frequency.is_empty() {
            return Err(TfidfError::EmptyVocabulary);
        }

        let max_docs = max_document_count(options.max_df, n_docs);
        if max_docs < options.min_df {
            return Err(TfidfError::InvalidBounds {
                max_docs,
                min_docs: options.min_df,
            });
        }

        // Alphabetical order from the BTreeMap is kept through the stable sort,
        // so frequency ties resolve alphabetically.
        let mut kept: Vec<(&str, usize)> = document_frequency
            .iter()
            .filter(|&(_, &df)| df >= options.min_df && df <= max_docs)
            .map(|(&term, _)| (term, corpus_frequency.get(term).copied().unwrap_or(0)))
            .collect();
        if kept.is_empty() {
            return Err(TfidfError::EmptyVocabulary);
        }
        if let Some(limit) = options.max_features
            && kept.len() > limit
        {
            kept.sort_by(|a, b| b.1.cmp(&a.1));
            kept.truncate(limit);
            kept.sort_by(|a, b| a.0.cmp(b.0));
        }
        if kept.is_empty() {
            return Err(TfidfError::EmptyVocabulary);
        }

        let vocabulary: Vec<String> = kept.iter().map(|(term, _)| (*term).to_string()).collect();
        #[allow(clippy::cast_precision_loss)]
        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|term| {
                let df = document_frequency.get(term.as_str()).copied().unwrap_or(0);
                ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
            })
            .collect();

        let mut rows = Vec::with_capacity(n_docs);
        for doc in &counts {
            #[allow(clippy::cast_precision_loss)]
            let mut row: Vec<f64> = vocabulary
                .iter()
                .zip(&idf)
                .map(|(term, weight)| doc.get(term).copied().unwrap_or(0) as f64 * weight)
                .collect();
            let norm = row.iter().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                row.iter_mut().for_each(|w| *w /= norm);
            }
            if let Some(index) = row.iter().position(|w| !w.is_finite()) {
                return Err(TfidfError::NonFiniteScore {
                    term: vocabulary[index].clone(),
                });
            }
            rows.push(row);
        }

        debug!(
            documents = n_docs,
            features = vocabulary.len(),
            "tf-idf model fitted"
        );
        Ok(Self {
            vocabulary,
            idf,
            rows,
        })
    }

    /// Vocabulary terms in alphabetical order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.vocabulary
    }

    /// Inverse document frequency per vocabulary term.
    #[must_use]
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    /// Number of documents the model was fitted on.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.rows.len()
    }

    /// Weight row of document `index`, aligned with [`Self::feature_names`].
    #[must_use]
    pub fn scores(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Terms of document `index` sorted by descending weight. Equal weights
    /// keep alphabetical order.
    #[must_use]
    pub fn ranked_terms(&self, index: usize) -> Vec<(&str, f64)> {
        let Some(row) = self.scores(index) else {
            return Vec::new();
        };
        let mut ranked: Vec<(&str, f64)> = self
            .vocabulary
            .iter()
            .map(String::as_str)
            .zip(row.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

fn count_terms(document: &str, min_term_chars: usize) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for term in document.split_whitespace() {
        if term.chars().count() < min_term_chars {
            continue;
        }
        *counts.entry(term.to_lowercase()).or_insert(0) += 1;
    }
    counts
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn max_document_count(max_df: f64, n_docs: usize) -> usize {
    if max_df >= 1.0 {
        n_docs
    } else {
        (max_df.max(0.0) * n_docs as f64).floor() as usize
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_single_document_scores_are_normalized_counts() {
        let model = TfidfModel::fit(["photon photon lattice"], &TfidfOptions::default()).unwrap();

        assert_eq!(model.feature_names(), &["lattice", "photon"]);
        assert!(model.idf().iter().all(|w| close(*w, 1.0)));

        let norm = 5.0_f64.sqrt();
        let row = model.scores(0).unwrap();
        assert!(close(row[0], 1.0 / norm));
        assert!(close(row[1], 2.0 / norm));
    }

    #[test]
    fn test_idf_penalizes_terms_shared_across_documents() {
        let model = TfidfModel::fit(
            ["quantum photon", "quantum lattice"],
            &TfidfOptions::default(),
        )
        .unwrap();

        let names = model.feature_names();
        let quantum = names.iter().position(|t| t == "quantum").unwrap();
        let photon = names.iter().position(|t| t == "photon").unwrap();
        assert!(model.idf()[quantum] < model.idf()[photon]);
        assert!(close(model.idf()[quantum], 1.0));
        assert!(close(model.idf()[photon], (3.0_f64 / 2.0).ln() + 1.0));
    }

    #[test]
    fn test_max_features_keeps_most_frequent_terms() {
        let options = TfidfOptions {
            max_features: Some(2),
            ..TfidfOptions::default()
        };
        let model = TfidfModel::fit(["zeta zeta alpha beta beta beta gamma"], &options).unwrap();
        assert_eq!(model.feature_names(), &["beta", "zeta"]);
    }

    #[test]
    fn test_max_features_ties_resolve_alphabetically() {
        let options = TfidfOptions {
            max_features: Some(2),
            ..TfidfOptions::default()
        };
        let model = TfidfModel::fit(["delta charlie bravo alpha"], &options).unwrap();
        assert_eq!(model.feature_names(), &["alpha", "bravo"]);
    }

    #[test]
    fn test_ranked_terms_descending_with_alphabetical_ties() {
        let model =
            TfidfModel::fit(["mango kiwi durian durian kiwi"], &TfidfOptions::default()).unwrap();
        let ranked: Vec<&str> = model.ranked_terms(0).into_iter().map(|(t, _)| t).collect();
        assert_eq!(ranked, vec!["durian", "kiwi", "mango"]);
        assert!(model.ranked_terms(5).is_empty());
    }

    #[test]
    fn test_empty_corpus_errors() {
        let docs: Vec<&str> = Vec::new();
        let err = TfidfModel::fit(docs, &TfidfOptions::default()).unwrap_err();
        assert_eq!(err, TfidfError::NoDocuments);
    }

    #[test]
    fn test_document_without_terms_errors() {
        let err = TfidfModel::fit(["a b c", "   "], &TfidfOptions::default()).unwrap_err();
        assert_eq!(err, TfidfError::EmptyVocabulary);
    }

    #[test]
    fn test_pruning_everything_errors() {
        let options = TfidfOptions {
            min_df: 2,
            ..TfidfOptions::default()
        };
        let err = TfidfModel::fit(["alpha beta", "gamma delta"], &options).unwrap_err();
        assert_eq!(err, TfidfError::EmptyVocabulary);
    }

    #[test]
    fn test_max_df_below_min_df_errors() {
        let options = TfidfOptions {
            max_df: 0.0,
            ..TfidfOptions::default()
        };
        let err = TfidfModel::fit(["alpha beta"], &options).unwrap_err();
        assert_eq!(
            err,
            TfidfError::InvalidBounds {
                max_docs: 0,
                min_docs: 1
            }
        );
    }
}
