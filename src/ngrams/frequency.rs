// N-gram frequency counting over normalized samples.
//
// All samples are normalized and pooled per arity, counted, ranked by
// descending count (stable on ties, so first-encountered wins), then cut
// to `top_n` entries with at least `min_freq` occurrences.
//
// Keyword exclusion is a plain substring test against the whole n-gram
// string: with keyword "cat", "cat food" and also "catalog" are skipped.

use indexmap::IndexMap;
use tracing::{debug, info};

use super::table::{rank, Arity, FrequencyTable};
use crate::corpus::{TopicCorpus, ALL_TOPICS, SAMPLING_MODE};
use crate::error::Result;
use crate::report::TopicReport;
use crate::text::normalizer::{NormalizedTokens, Normalizer};

/// Counts and ranks n-grams per arity.
#[derive(Debug, Clone)]
pub struct FrequencyCounter {
    /// Maximum entries kept per arity
    pub top_n: usize,
    /// Minimum count for an entry to be kept
    pub min_freq: u64,
}

impl Default for FrequencyCounter {
    fn default() -> Self {
        Self {
            top_n: 20,
            min_freq: 2,
        }
    }
}

impl FrequencyCounter {
    pub fn new(top_n: usize, min_freq: u64) -> Self {
        Self { top_n, min_freq }
    }

    /// Count n-grams across `samples`, skipping any n-gram that contains
    /// one of `excluded` as a substring.
    pub fn count(
        &self,
        normalizer: &Normalizer,
        samples: &[String],
        excluded: &[String],
    ) -> FrequencyTable {
        let normalized: Vec<NormalizedTokens> =
            samples.iter().map(|s| normalizer.normalize(s)).collect();

        let mut table = FrequencyTable::default();
        for arity in Arity::ALL {
            let pooled = normalized.iter().flat_map(|tokens| tokens.get(arity));
            let counts = count_pooled(pooled, excluded);
            *table.get_mut(arity) = rank(counts.into_iter().collect(), self.top_n, Some(self.min_freq));
        }
        table
    }

    /// One table per topic (excluding the topic's own keywords) plus an
    /// "All" table over every topic's samples (excluding every topic's keywords).
    pub fn count_by_topic(
        &self,
        normalizer: &Normalizer,
        corpus: &TopicCorpus,
    ) -> Result<TopicReport<FrequencyTable>> {
        let mut report = TopicReport::new();
        let all_samples = corpus.all_samples(SAMPLING_MODE)?;
        let mut all_keywords: Vec<String> = Vec::new();

        for topic in corpus.topics() {
            let samples = topic.samples(SAMPLING_MODE)?;
            let keywords = normalizer.keywords(&topic.name);

            let table = self.count(normalizer, samples, &keywords);
            debug!(
                topic = %topic.name,
                samples = samples.len(),
                unigrams = table.unigrams.len(),
                "Counted topic n-grams"
            );
            report.insert(topic.name.clone(), table);
            all_keywords.extend(keywords);
        }

        report.insert(ALL_TOPICS, self.count(normalizer, &all_samples, &all_keywords));
        info!(
            topics = corpus.topics().len(),
            samples = all_samples.len(),
            "Counted n-gram frequencies"
        );
        Ok(report)
    }
}

/// Count occurrences in first-encounter order.
fn count_pooled<'a>(
    ngrams: impl Iterator<Item = &'a String>,
    excluded: &[String],
) -> IndexMap<String, u64> {
    let mut counts: IndexMap<String, u64> = IndexMap::new();
    for ngram in ngrams {
        if is_excluded(ngram, excluded) {
            continue;
        }
        *counts.entry(ngram.clone()).or_insert(0) += 1;
    }
    counts
}

/// Substring match against the whole n-gram string, not token-by-token.
pub fn is_excluded(ngram: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|keyword| ngram.contains(keyword.as_str()))
}
