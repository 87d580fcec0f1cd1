//! Error types.
//!
//! `RuleError` is what rule functions hand to `SuggestionSet::report_error`;
//! it never aborts a run. `AnalyzerError` covers driver failures (loading,
//! parsing, configuration) and is propagated to the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Anomaly captured while a rule function inspects a submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("unexpected tree shape in {rule}: {detail}")]
    UnexpectedShape { rule: &'static str, detail: String },

    #[error("{0}")]
    Message(String),
}

impl RuleError {
    pub fn unexpected(rule: &'static str, detail: impl Into<String>) -> Self {
        RuleError::UnexpectedShape {
            rule,
            detail: detail.into(),
        }
    }

    /// A message with no text carries no information and counts as absent.
    pub fn is_empty(&self) -> bool {
        matches!(self, RuleError::Message(m) if m.trim().is_empty())
    }
}

impl From<&str> for RuleError {
    fn from(s: &str) -> Self {
        RuleError::Message(s.to_string())
    }
}

impl From<String> for RuleError {
    fn from(s: String) -> Self {
        RuleError::Message(s)
    }
}

/// Driver-level failure.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("unknown exercise '{0}'")]
    UnknownExercise(String),

    #[error("solution directory not found: {}", .0.display())]
    MissingSolution(PathBuf),

    #[error("no .go files found in {}", .0.display())]
    NoSourceFiles(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load Go grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("parser produced no tree for {}", .0.display())]
    Parse(PathBuf),

    #[error("invalid config {}: {detail}", path.display())]
    Config { path: PathBuf, detail: String },

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
