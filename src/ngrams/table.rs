// Ranked n-gram tables, the shared output shape of the frequency counter
// and the TF-IDF scorer.
//
// Serialized as {"1": {term: value, ...}, "2": {...}, "3": {...}} with each
// inner map in rank order (highest value first).

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Number of tokens in an n-gram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Arity {
    Unigram = 1,
    Bigram = 2,
    Trigram = 3,
}

impl Arity {
    pub const ALL: [Arity; 3] = [Arity::Unigram, Arity::Bigram, Arity::Trigram];

    pub fn n(self) -> usize {
        self as usize
    }

    /// Classify a space-joined n-gram string by its word count.
    pub fn of(ngram: &str) -> Option<Arity> {
        match ngram.split(' ').count() {
            1 => Some(Arity::Unigram),
            2 => Some(Arity::Bigram),
            3 => Some(Arity::Trigram),
            _ => None,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.n())
    }
}

/// Per-arity ranked term → value tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NgramTable<V> {
    #[serde(rename = "1", default)]
    pub unigrams: IndexMap<String, V>,
    #[serde(rename = "2", default)]
    pub bigrams: IndexMap<String, V>,
    #[serde(rename = "3", default)]
    pub trigrams: IndexMap<String, V>,
}

/// Occurrence counts per n-gram.
pub type FrequencyTable = NgramTable<u64>;

/// Summed TF-IDF weights per n-gram.
pub type TfidfScoreTable = NgramTable<f64>;

impl<V> Default for NgramTable<V> {
    fn default() -> Self {
        Self {
            unigrams: IndexMap::new(),
            bigrams: IndexMap::new(),
            trigrams: IndexMap::new(),
        }
    }
}

impl<V> NgramTable<V> {
    pub fn get(&self, arity: Arity) -> &IndexMap<String, V> {
        match arity {
            Arity::Unigram => &self.unigrams,
            Arity::Bigram => &self.bigrams,
            Arity::Trigram => &self.trigrams,
        }
    }

    pub fn get_mut(&mut self, arity: Arity) -> &mut IndexMap<String, V> {
        match arity {
            Arity::Unigram => &mut self.unigrams,
            Arity::Bigram => &mut self.bigrams,
            Arity::Trigram => &mut self.trigrams,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Arity, &IndexMap<String, V>)> {
        Arity::ALL.into_iter().map(move |a| (a, self.get(a)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, terms)| terms.is_empty())
    }
}

/// Rank entries by descending value and keep the first `top_n`.
///
/// The sort is stable, so equal values keep the order they arrive in.
/// With a `floor`, entries below it are dropped after truncation.
pub fn rank<V>(mut entries: Vec<(String, V)>, top_n: usize, floor: Option<V>) -> IndexMap<String, V>
where
    V: PartialOrd + Copy,
{
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    entries
        .into_iter()
        .take(top_n)
        .filter(|(_, value)| floor.map_or(true, |min| *value >= min))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, u64)]) -> Vec<(String, u64)> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_rank_descending_stable() {
        let ranked = rank(entries(&[("a", 1), ("b", 3), ("c", 1), ("d", 3)]), 10, None);
        let keys: Vec<&str> = ranked.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_rank_truncates_then_applies_floor() {
        let ranked = rank(entries(&[("a", 5), ("b", 4), ("c", 1), ("d", 1)]), 3, Some(2));
        let keys: Vec<&str> = ranked.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_arity_of() {
        assert_eq!(Arity::of("cat"), Some(Arity::Unigram));
        assert_eq!(Arity::of("great pet"), Some(Arity::Bigram));
        assert_eq!(Arity::of("cat great pet"), Some(Arity::Trigram));
        assert_eq!(Arity::of("a b c d"), None);
    }

    #[test]
    fn test_table_serializes_with_arity_keys() {
        let mut table = FrequencyTable::default();
        table.unigrams.insert("cat".to_string(), 2);
        table.bigrams.insert("great pet".to_string(), 1);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"1":{"cat":2},"2":{"great pet":1},"3":{}}"#);
    }
}
