// TF-IDF vectorizer: fit a vocabulary and IDF weights over a corpus, then
// weight individual documents against that fitted model.
//
// Analyzer: lowercase, extract tokens matching `\b[\w\-]+\b` (so hyphenated
// compounds such as "covid-19" stay one token), drop stop terms, emit every
// n-gram in the configured range (all 1-grams, then 2-grams, then 3-grams).
//
// Weighting: smoothed IDF, ln((1 + n_docs) / (1 + df)) + 1, raw term counts
// as TF, each document vector L2-normalized.

use std::collections::{BTreeMap, HashMap, HashSet};

use regex::Regex;
use tracing::debug;

use crate::error::{AnalysisError, Result};

/// Token rule for the TF-IDF path. Deliberately distinct from the normalizer's
/// word tokenizer.
pub const TOKEN_PATTERN: &str = r"\b[\w\-]+\b";

/// Unfitted vectorizer settings.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    stop_terms: HashSet<String>,
    min_n: usize,
    max_n: usize,
    max_features: Option<usize>,
    token_pattern: Regex,
}

/// A vectorizer fitted to a corpus: sorted vocabulary with its IDF weights.
#[derive(Debug, Clone)]
pub struct FittedTfidf {
    vectorizer: TfidfVectorizer,
    features: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Vectorizer over n-grams `min_n..=max_n`.
    pub fn new(min_n: usize, max_n: usize) -> Self {
        Self {
            stop_terms: HashSet::new(),
            min_n: min_n.max(1),
            max_n: max_n.max(min_n.max(1)),
            max_features: None,
            // The pattern is a compile-time constant.
            token_pattern: Regex::new(TOKEN_PATTERN).expect("valid token pattern"),
        }
    }

    /// Tokens removed before n-grams are formed.
    pub fn with_stop_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_terms = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Keep only the `max` most frequent features (by total corpus count).
    pub fn with_max_features(mut self, max: usize) -> Self {
        self.max_features = Some(max);
        self
    }

    /// Features of one document, in emission order (repeats included).
    pub fn analyze(&self, doc: &str) -> Vec<String> {
        let lowered = doc.to_lowercase();
        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_terms.contains(*t))
            .collect();

        let mut features = Vec::new();
        for n in self.min_n..=self.max_n {
            if n > tokens.len() {
                break;
            }
            features.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        features
    }

    /// Learn the vocabulary and IDF weights from `docs`.
    pub fn fit(self, docs: &[String]) -> Result<FittedTfidf> {
        // BTreeMap keeps the vocabulary alphabetically ordered.
        let mut term_totals: BTreeMap<String, u64> = BTreeMap::new();
        let mut doc_freq: HashMap<String, u64> = HashMap::new();

        for doc in docs {
            let mut seen: HashSet<String> = HashSet::new();
            for feature in self.analyze(doc) {
                *term_totals.entry(feature.clone()).or_insert(0) += 1;
                if !seen.contains(&feature) {
                    *doc_freq.entry(feature.clone()).or_insert(0) += 1;
                    seen.insert(feature);
                }
            }
        }

        if term_totals.is_empty() {
            return Err(AnalysisError::EmptyVocabulary);
        }

        let mut features: Vec<String> = match self.max_features {
            Some(max) if term_totals.len() > max => {
                let mut by_total: Vec<(String, u64)> = term_totals.into_iter().collect();
                // Stable: equal totals stay alphabetical.
                by_total.sort_by(|a, b| b.1.cmp(&a.1));
                by_total.truncate(max);
                by_total.into_iter().map(|(term, _)| term).collect()
            }
            _ => term_totals.into_keys().collect(),
        };
        features.sort();

        let n_docs = docs.len() as f64;
        let idf: Vec<f64> = features
            .iter()
            .map(|f| {
                let df = doc_freq.get(f).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let index = features
            .iter()
            .enumerate()
            .map(|(i, f)| (f.clone(), i))
            .collect();

        debug!(documents = docs.len(), features = features.len(), "Fitted TF-IDF vocabulary");

        Ok(FittedTfidf {
            vectorizer: self,
            features,
            index,
            idf,
        })
    }
}

impl FittedTfidf {
    /// Vocabulary in alphabetical order; feature ids are positions in this slice.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn idf(&self, feature: &str) -> Option<f64> {
        self.index.get(feature).map(|&i| self.idf[i])
    }

    /// L2-normalized TF-IDF weights of one document as (feature id, weight),
    /// ordered by feature id. Features outside the vocabulary are ignored.
    pub fn transform(&self, doc: &str) -> Vec<(usize, f64)> {
        let mut counts: BTreeMap<usize, u64> = BTreeMap::new();
        for feature in self.vectorizer.analyze(doc) {
            if let Some(&id) = self.index.get(&feature) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }

        let mut row: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(id, tf)| (id, tf as f64 * self.idf[id]))
            .collect();

        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut row {
                *w /= norm;
            }
        }
        row
    }
}
