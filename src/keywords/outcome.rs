//! Extraction result: genuine keywords or a single diagnostic placeholder.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reason why no genuine keywords could be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The document yielded no text at all.
    NoTextFound,
    /// Normalized text has fewer words than the document threshold.
    TextTooShortToAnalyze,
    /// Too few candidate tokens survived filtering.
    TooShortForAnalysis,
    /// Ranking produced nothing above the significance threshold.
    NoSignificantKeywords,
    /// Recovery after a failure found no usable words.
    UnableToProcess,
    /// Recovery itself failed.
    AnalysisError(String),
    /// The caller asked for zero keywords.
    NoKeywordsRequested,
}

impl Diagnostic {
    /// Human-readable placeholder stored in place of keywords.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NoTextFound => "no text found in document".to_string(),
            Self::TextTooShortToAnalyze => "text too short to analyze".to_string(),
            Self::TooShortForAnalysis => "text too short for analysis".to_string(),
            Self::NoSignificantKeywords => "no significant keywords found".to_string(),
            Self::UnableToProcess => "unable to process text".to_string(),
            Self::AnalysisError(detail) => format!("error during analysis: {detail}"),
            Self::NoKeywordsRequested => "no keywords requested".to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Outcome of one extraction call. Never mixes diagnostics with keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordOutcome {
    /// Ranked keywords, most relevant first.
    Keywords(Vec<String>),
    /// Placeholder explaining why extraction could not proceed.
    Diagnostic(Diagnostic),
}

impl KeywordOutcome {
    /// Returns `true` for the diagnostic variant.
    #[must_use]
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::Diagnostic(_))
    }

    /// Genuine keywords, or `None` for a diagnostic.
    #[must_use]
    pub fn keywords(&self) -> Option<&[String]> {
        match self {
            Self::Keywords(keywords) => Some(keywords),
            Self::Diagnostic(_) => None,
        }
    }

    /// Flattens into the list shape handed to callers: the keywords, or
    /// the diagnostic message as a single entry.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Keywords(keywords) => keywords,
            Self::Diagnostic(diagnostic) => vec![diagnostic.message()],
        }
    }

    /// Joins the list shape with `", "` for storage in a single text field.
    #[must_use]
    pub fn joined(&self) -> String {
        self.clone().into_vec().join(", ")
    }
}

impl From<Diagnostic> for KeywordOutcome {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::Diagnostic(diagnostic)
    }
}
