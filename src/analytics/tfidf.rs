//! Keyword salience over video titles
//!
//! Each title is one document. A term's weight in a document is
//! `tf * idf`, where `tf` is the raw count of the term in the title
//! (or `1 + ln(tf)` with `sublinear_tf`) and
//!
//! ```text
//! idf = ln((1 + n) / (1 + df)) + 1   smooth_idf = true
//! idf = ln(n / df) + 1               smooth_idf = false
//! ```
//!
//! Document vectors are L2-normalized when `l2_normalize` is set, then each
//! term's weights are summed over all documents. The summed scores are not
//! normalized again.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;
use tracing::debug;

use super::stop_words::is_stop_word;
use crate::record::Row;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TfIdfConfig {
    pub smooth_idf: bool,
    pub sublinear_tf: bool,
    pub l2_normalize: bool,
}

impl Default for TfIdfConfig {
    fn default() -> Self {
        Self {
            smooth_idf: true,
            sublinear_tf: false,
            l2_normalize: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermScore {
    pub term: String,
    pub score: f64,
}

/// Terms ranked by descending score; equal scores are ordered alphabetically
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TermScoreTable {
    pub entries: Vec<TermScore>,
}

impl TermScoreTable {
    pub fn top(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn terms(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.term.as_str()).collect()
    }

    pub fn score(&self, term: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.term == term).map(|e| e.score)
    }
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"))
}

/// Lower-case word tokens of two or more characters, stop words removed
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_regex()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Score every term across `documents`
pub fn term_weights<S: AsRef<str>>(documents: &[S], config: &TfIdfConfig) -> TermScoreTable {
    let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

    let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
    for tokens in &tokenized {
        let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for token in unique {
            *doc_freq.entry(token).or_insert(0) += 1;
        }
    }

    if doc_freq.is_empty() {
        debug!("No scorable terms in {} titles", documents.len());
        return TermScoreTable::default();
    }

    let n = documents.len() as f64;
    let idf: HashMap<&str, f64> = doc_freq
        .iter()
        .map(|(&term, &df)| {
            let df = df as f64;
            let value = if config.smooth_idf {
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            } else {
                (n / df).ln() + 1.0
            };
            (term, value)
        })
        .collect();

    let mut totals: BTreeMap<&str, f64> = doc_freq.keys().map(|&term| (term, 0.0)).collect();

    for tokens in &tokenized {
        let mut counts: HashMap<&str, f64> = HashMap::new();
        for token in tokens {
            *counts.entry(token.as_str()).or_insert(0.0) += 1.0;
        }

        let weights: Vec<(&str, f64)> = counts
            .into_iter()
            .map(|(term, count)| {
                let tf = if config.sublinear_tf { 1.0 + count.ln() } else { count };
                (term, tf * idf[term])
            })
            .collect();

        let norm = if config.l2_normalize {
            weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
        } else {
            1.0
        };
        if norm == 0.0 {
            continue;
        }

        for (term, weight) in weights {
            if let Some(total) = totals.get_mut(term) {
                *total += weight / norm;
            }
        }
    }

    // totals iterate alphabetically, and the stable sort keeps that order for ties
    let mut entries: Vec<TermScore> = totals
        .into_iter()
        .map(|(term, score)| TermScore {
            term: term.to_string(),
            score,
        })
        .collect();
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));

    TermScoreTable { entries }
}

/// Highest-weighted title terms of the rows
pub fn title_term_weights(rows: &[Row], config: &TfIdfConfig, top_n: usize) -> TermScoreTable {
    if rows.is_empty() {
        return TermScoreTable::default();
    }

    let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
    term_weights(&titles, config).top(top_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("How to Make the BEST Pasta!"), vec!["make", "best", "pasta"]);
        assert_eq!(tokenize("a b c 4k"), vec!["4k"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_three_document_ranking() {
        let docs = ["Rust tutorial", "Rust web server", "Cooking pasta"];
        let table = term_weights(&docs, &TfIdfConfig::default());

        assert_eq!(table.terms(), vec!["rust", "tutorial", "cooking", "pasta", "server", "web"]);

        let idf_rust = (4.0f64 / 3.0).ln() + 1.0;
        let idf_rare = 2.0f64.ln() + 1.0;
        let norm1 = (idf_rust.powi(2) + idf_rare.powi(2)).sqrt();
        let norm2 = (idf_rust.powi(2) + 2.0 * idf_rare.powi(2)).sqrt();

        assert!(approx(table.score("rust").unwrap(), idf_rust / norm1 + idf_rust / norm2));
        assert!(approx(table.score("tutorial").unwrap(), idf_rare / norm1));
        assert!(approx(table.score("web").unwrap(), idf_rare / norm2));
        assert!(approx(table.score("pasta").unwrap(), 1.0 / 2.0f64.sqrt()));
    }

    #[test]
    fn test_unnormalized_scores() {
        let docs = ["Rust tutorial", "Rust web server", "Cooking pasta"];
        let config = TfIdfConfig {
            l2_normalize: false,
            ..TfIdfConfig::default()
        };
        let table = term_weights(&docs, &config);

        assert!(approx(table.score("rust").unwrap(), 2.0 * ((4.0f64 / 3.0).ln() + 1.0)));
        assert!(approx(table.score("web").unwrap(), 2.0f64.ln() + 1.0));
    }

    #[test]
    fn test_unsmoothed_idf() {
        let docs = ["Rust tutorial", "Rust web server", "Cooking pasta"];
        let config = TfIdfConfig {
            smooth_idf: false,
            l2_normalize: false,
            ..TfIdfConfig::default()
        };
        let table = term_weights(&docs, &config);

        assert!(approx(table.score("rust").unwrap(), 2.0 * ((3.0f64 / 2.0).ln() + 1.0)));
        assert!(approx(table.score("tutorial").unwrap(), 3.0f64.ln() + 1.0));
        assert_eq!(table.terms()[0], "rust");
    }

    #[test]
    fn test_sublinear_tf() {
        let docs = ["Pasta pasta sauce", "Sauce"];
        let config = TfIdfConfig {
            sublinear_tf: true,
            l2_normalize: false,
            ..TfIdfConfig::default()
        };
        let table = term_weights(&docs, &config);

        // "pasta" appears twice in one title, "sauce" once in each
        let idf_pasta = 1.5f64.ln() + 1.0;
        assert!(approx(table.score("pasta").unwrap(), (1.0 + 2.0f64.ln()) * idf_pasta));
        assert!(approx(table.score("sauce").unwrap(), 2.0));
        assert_eq!(table.terms(), vec!["pasta", "sauce"]);
    }

    #[test]
    fn test_shared_term_ranks_first_in_small_corpus() {
        let table = term_weights(&["Hello World", "Hello Again"], &TfIdfConfig::default());
        // "again" is a stop word
        assert_eq!(table.terms(), vec!["hello", "world"]);
    }

    #[test]
    fn test_degenerate_corpus_is_empty() {
        assert!(term_weights(&["The", "and of", "a b"], &TfIdfConfig::default()).is_empty());
        assert!(term_weights::<&str>(&[], &TfIdfConfig::default()).is_empty());
        assert!(title_term_weights(&[], &TfIdfConfig::default(), 10).is_empty());
    }

    #[test]
    fn test_single_title() {
        let table = term_weights(&["Guard passing fundamentals"], &TfIdfConfig::default());
        assert_eq!(table.terms(), vec!["fundamentals", "guard", "passing"]);
        assert!(table.entries.iter().all(|e| approx(e.score, 1.0 / 3.0f64.sqrt())));
    }
}
