//! Similarity matching: TF-IDF vector space + cosine similarity.
//!
//! A vector space is fitted on the query column of a corpus for every call.
//! The query string is projected into the same space and compared against
//! every row. Below the threshold the result collapses onto the fallback
//! row at index 0.
//!
//! Weighting follows the classic vectorizer defaults: lowercase, tokens of
//! two or more word characters, raw counts, smoothed idf
//! `ln((1 + n) / (1 + df)) + 1`, l2-normalised rows.

use crate::corpus::Corpus;
use crate::error::{ChatbotError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

/// Row returned when the best score is below threshold.
pub const FALLBACK_ROW: usize = 0;

lazy_static! {
    static ref RE_TERM: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

/// Which fields of the winning row to return.
#[derive(Debug, Clone, Copy)]
pub enum ResultFields<'a> {
    Single(&'a str),
    Many(&'a [&'a str]),
}

/// The winning row's requested fields plus its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Row the fields were read from (the fallback row when below threshold).
    pub row: usize,
    /// Best cosine similarity, even when the fallback row was returned.
    pub score: f64,
    /// Requested field values, in request order.
    pub fields: Vec<String>,
}

impl MatchResult {
    /// The first (or only) requested field.
    pub fn value(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    /// A requested field by position.
    pub fn field(&self, idx: usize) -> &str {
        self.fields.get(idx).map(String::as_str).unwrap_or_default()
    }

    pub fn is_fallback(&self) -> bool {
        self.row == FALLBACK_ROW
    }
}

/// A TF-IDF space fitted on one set of documents.
#[derive(Debug)]
pub struct TfidfSpace {
    vocab: HashMap<String, usize>,
    idf: Vec<f64>,
    doc_vecs: Vec<Vec<(usize, f64)>>,
}

impl TfidfSpace {
    /// Fit vocabulary and idf on `docs` and vectorize them.
    pub fn fit<S: AsRef<str>>(docs: &[S]) -> Self {
        let analyzed: Vec<Vec<String>> = docs.iter().map(|d| analyze(d.as_ref())).collect();

        // Vocabulary in sorted term order
        let mut terms: Vec<&String> = analyzed.iter().flatten().collect();
        terms.sort();
        terms.dedup();
        let vocab: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        let mut df = vec![0usize; vocab.len()];
        for doc in &analyzed {
            let mut seen: Vec<usize> = doc.iter().filter_map(|t| vocab.get(t).copied()).collect();
            seen.sort_unstable();
            seen.dedup();
            for idx in seen {
                df[idx] += 1;
            }
        }

        let n = analyzed.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let mut space = Self {
            vocab,
            idf,
            doc_vecs: Vec::new(),
        };
        space.doc_vecs = analyzed.iter().map(|doc| space.weigh(doc)).collect();
        space
    }

    pub fn vocab_len(&self) -> usize {
        self.vocab.len()
    }

    /// Project a text into the fitted space (terms outside the vocabulary are dropped).
    pub fn transform(&self, text: &str) -> Vec<(usize, f64)> {
        self.weigh(&analyze(text))
    }

    /// Cosine similarity of `text` against every fitted document.
    pub fn similarities(&self, text: &str) -> Vec<f64> {
        let query = self.transform(text);
        self.doc_vecs.iter().map(|doc| cosine(&query, doc)).collect()
    }

    fn weigh(&self, terms: &[String]) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in terms {
            if let Some(&idx) = self.vocab.get(term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        let mut vec: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();
        vec.sort_unstable_by_key(|(idx, _)| *idx);
        l2_normalize(&mut vec);
        vec
    }
}

/// Match `query_tokens` against `query_field` of `corpus`, applying `threshold`.
pub fn best_match<S: AsRef<str>>(
    query_tokens: &[S],
    corpus: &Corpus,
    query_field: &str,
    result_fields: ResultFields<'_>,
    threshold: f64,
) -> Result<MatchResult> {
    let (best_row, score) = best_row(query_tokens, corpus, query_field)?;
    let row = if score >= threshold { best_row } else { FALLBACK_ROW };

    debug!(
        "Matched {} row {} (score: {:.3}, threshold: {:.2}, fallback: {})",
        corpus.name(),
        best_row,
        score,
        threshold,
        row != best_row
    );

    Ok(MatchResult {
        row,
        score,
        fields: read_fields(corpus, row, result_fields)?,
    })
}

/// Best row without any threshold.
pub fn best_match_unthresholded<S: AsRef<str>>(
    query_tokens: &[S],
    corpus: &Corpus,
    query_field: &str,
    result_fields: ResultFields<'_>,
) -> Result<MatchResult> {
    let (row, score) = best_row(query_tokens, corpus, query_field)?;
    Ok(MatchResult {
        row,
        score,
        fields: read_fields(corpus, row, result_fields)?,
    })
}

/// Argmax over cosine similarities; the first row wins ties.
fn best_row<S: AsRef<str>>(
    query_tokens: &[S],
    corpus: &Corpus,
    query_field: &str,
) -> Result<(usize, f64)> {
    if corpus.is_empty() {
        return Err(ChatbotError::EmptyCorpus(corpus.name().to_string()));
    }
    let docs = corpus.column_values(query_field)?;
    let query = query_tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" ");

    let space = TfidfSpace::fit(&docs);
    let sims = space.similarities(&query);

    let mut best = (0, sims[0]);
    for (idx, &sim) in sims.iter().enumerate().skip(1) {
        if sim > best.1 {
            best = (idx, sim);
        }
    }
    Ok(best)
}

fn read_fields(corpus: &Corpus, row: usize, fields: ResultFields<'_>) -> Result<Vec<String>> {
    let names: Vec<&str> = match fields {
        ResultFields::Single(name) => vec![name],
        ResultFields::Many([]) => {
            return Err(ChatbotError::UnsupportedResultFields(
                "empty field list".to_string(),
            ))
        }
        ResultFields::Many(names) => names.to_vec(),
    };
    names
        .into_iter()
        .map(|name| {
            let idx = corpus.column(name)?;
            Ok(corpus.rows()[row][idx].clone())
        })
        .collect()
}

fn analyze(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    RE_TERM
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn l2_normalize(v: &mut [(usize, f64)]) {
    let norm = v.iter().map(|(_, x)| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|(_, x)| *x /= norm);
    }
}

/// Dot product of two sparse, index-sorted, normalised vectors.
fn cosine(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j, mut dot) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot.clamp(0.0, 1.0)
}
