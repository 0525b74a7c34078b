//! Error types shared by every layer of the chatbot.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatbotError {
    #[error("Failed to read corpus from {path}: {source}")]
    CorpusRead { path: PathBuf, source: io::Error },

    #[error("Failed to parse corpus {path}: {source}")]
    CorpusParse { path: PathBuf, source: csv::Error },

    #[error("Column '{column}' not found in corpus {corpus}")]
    MissingColumn { corpus: String, column: String },

    #[error("Corpus {0} has no rows, a fallback row is required at index 0")]
    EmptyCorpus(String),

    #[error("Unsupported result field specification: {0}")]
    UnsupportedResultFields(String),

    #[error("Failed to read preferences from {path}: {source}")]
    PreferenceRead { path: PathBuf, source: io::Error },

    #[error("Failed to write preferences to {path}: {source}")]
    PreferenceWrite { path: PathBuf, source: io::Error },

    #[error("Failed to parse preferences: {0}")]
    PreferenceParse(#[from] serde_json::Error),

    #[error("Console I/O failed: {0}")]
    Console(#[from] io::Error),

    #[error("Console input closed")]
    InputClosed,

    #[error("No data directory found (tried {0})")]
    NoDataDir(String),
}

pub type Result<T> = std::result::Result<T, ChatbotError>;
