//! Error types for the FAQ desk.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while loading the question/answer/pattern sources.
///
/// All variants are fatal at startup: the service never serves turns from a
/// partially loaded store.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "data files are misaligned: {questions} questions, {answers} answers, {patterns} patterns"
    )]
    LengthMismatch {
        questions: usize,
        answers: usize,
        patterns: usize,
    },

    #[error("pattern on line {line} is invalid: {source}")]
    InvalidPattern {
        line: usize,
        #[source]
        source: regex::Error,
    },

    #[error("pattern on line {line} is empty")]
    EmptyPattern { line: usize },
}

/// Failure while reading the TOML configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure reported by an [`Annotator`](crate::annotator::Annotator).
///
/// Never surfaced to the user; the fallback rules degrade instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotatorError {
    #[error("annotator unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum FaqError {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl FaqError {
    /// Process exit code for drivers that fail at startup.
    pub fn code(&self) -> i32 {
        match self {
            FaqError::DataLoad(_) => 65,
            FaqError::Config(_) => 78,
        }
    }
}
