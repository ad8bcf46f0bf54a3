//! Error types for run-level failures
//!
//! Per-record problems are not errors: they travel as [`crate::models::Reason`]
//! values inside a validation report. Everything here aborts the whole run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptoriumError {
    #[error("reference corpus {} contains no lines", .0.display())]
    EmptyCorpus(PathBuf),

    #[error("corpus extraction from {} produced zero lines", .0.display())]
    EmptyExtraction(PathBuf),

    #[error("unknown stream '{0}'. Valid streams: A, B")]
    UnknownStream(String),

    #[error("unknown seed mode '{0}'. Valid modes: normal, neutral")]
    UnknownSeedMode(String),

    #[error("unknown similarity metric '{0}'. Valid metrics: js_bigram, js_unigram, cosine_trigram")]
    UnknownMetric(String),

    #[error("unknown format '{0}'. Valid formats: text, json")]
    UnknownFormat(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{}:{line}: unparseable card: {message}", .path.display())]
    CardParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScriptoriumError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScriptoriumError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScriptoriumError>;
