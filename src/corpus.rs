//! Reference corpora: headed CSV tables loaded with `csv`.
//!
//! Every corpus consumed by the matcher carries its fallback row at index 0.

use crate::error::{ChatbotError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;
use tracing::{debug, info};

/// A tabular reference corpus: ordered rows of string fields.
#[derive(Debug, Clone)]
pub struct Corpus {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Corpus {
    /// Build a corpus from in-memory rows.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Load a headed CSV file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ChatbotError::CorpusRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let parse_err = |e: csv::Error| ChatbotError::CorpusParse {
            path: path.to_path_buf(),
            source: e,
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let headers: Vec<String> = reader
            .headers()
            .map_err(parse_err)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(parse_err)?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("Loaded corpus {} ({} rows)", name, rows.len());

        Ok(Self::new(name, headers, rows))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Index of a header, or `MissingColumn`.
    pub fn column(&self, header: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == header)
            .ok_or_else(|| ChatbotError::MissingColumn {
                corpus: self.name.clone(),
                column: header.to_string(),
            })
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, header: &str) -> Result<Vec<&str>> {
        let idx = self.column(header)?;
        Ok(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// A single cell; `None` when the row or column is absent.
    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        let idx = self.headers.iter().position(|h| h == header)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }
}

/// The named corpus files the chatbot reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorpusKind {
    Games,
    Intent,
    IntentResponse,
    GameSearch,
    QuestionAnswer,
}

impl CorpusKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            CorpusKind::Games => "games.csv",
            CorpusKind::Intent => "intent.csv",
            CorpusKind::IntentResponse => "intent_response.csv",
            CorpusKind::GameSearch => "game_search.csv",
            CorpusKind::QuestionAnswer => "question_answer.csv",
        }
    }

    pub fn all() -> &'static [CorpusKind] {
        &[
            CorpusKind::Games,
            CorpusKind::Intent,
            CorpusKind::IntentResponse,
            CorpusKind::GameSearch,
            CorpusKind::QuestionAnswer,
        ]
    }
}

/// Resolves corpus files under a data directory.
///
/// Parsed files are cached per path and reloaded when the modification
/// time changes, so edits on disk are picked up on the next turn.
#[derive(Debug)]
pub struct CorpusLibrary {
    data_dir: PathBuf,
    cache: RefCell<HashMap<CorpusKind, (Option<SystemTime>, Rc<Corpus>)>>,
}

impl CorpusLibrary {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn path(&self, kind: CorpusKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    /// Load (or reuse) a corpus.
    pub fn get(&self, kind: CorpusKind) -> Result<Rc<Corpus>> {
        let path = self.path(kind);
        let modified = fs::metadata(&path)
            .map_err(|e| ChatbotError::CorpusRead {
                path: path.clone(),
                source: e,
            })?
            .modified()
            .ok();

        if let Some((stamp, corpus)) = self.cache.borrow().get(&kind) {
            if modified.is_some() && *stamp == modified {
                return Ok(Rc::clone(corpus));
            }
        }

        debug!("Reading corpus from: {:?}", path);
        let corpus = Rc::new(Corpus::load(&path)?);
        self.cache
            .borrow_mut()
            .insert(kind, (modified, Rc::clone(&corpus)));
        Ok(corpus)
    }

    /// Load every corpus once; a missing file is a startup error.
    pub fn verify(&self) -> Result<()> {
        for kind in CorpusKind::all() {
            self.get(*kind)?;
        }
        Ok(())
    }
}
