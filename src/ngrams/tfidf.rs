// Corpus-relative TF-IDF term importance per topic.
//
// The vectorizer is fitted over every normalized document of every topic,
// then only the topic's own documents are weighted against it. A feature's
// score is the sum of its weights over the topic documents that contain it.
// Features are bucketed by word count and each bucket is ranked separately.
//
// Scores are accumulated in vocabulary (alphabetical) order, so ties in the
// ranked output fall back to alphabetical order.

use tracing::{debug, info};

use super::table::{rank, Arity, TfidfScoreTable};
use super::vectorizer::TfidfVectorizer;
use crate::corpus::{TopicCorpus, ALL_TOPICS, SAMPLING_MODE};
use crate::error::Result;
use crate::report::TopicReport;
use crate::text::normalizer::Normalizer;

/// Sums and ranks TF-IDF weights per n-gram arity.
#[derive(Debug, Clone)]
pub struct TfIdfScorer {
    /// Maximum entries kept per arity
    pub top_n: usize,
    /// Vocabulary cap applied when fitting the corpus
    pub max_features: usize,
}

impl Default for TfIdfScorer {
    fn default() -> Self {
        Self {
            top_n: 20,
            max_features: 5000,
        }
    }
}

impl TfIdfScorer {
    pub fn new(top_n: usize, max_features: usize) -> Self {
        Self { top_n, max_features }
    }

    /// Score `topic_docs` against a model fitted on `corpus_docs`.
    ///
    /// Both document lists hold space-joined normalized unigrams. `excluded`
    /// terms are removed as stop terms before n-grams are formed.
    pub fn score(
        &self,
        corpus_docs: &[String],
        topic_docs: &[String],
        excluded: &[String],
    ) -> Result<TfidfScoreTable> {
        if topic_docs.is_empty() {
            return Ok(TfidfScoreTable::default());
        }

        let fitted = TfidfVectorizer::new(1, 3)
            .with_stop_terms(excluded.iter().cloned())
            .with_max_features(self.max_features)
            .fit(corpus_docs)?;

        let features = fitted.features();
        let mut sums: Vec<Option<f64>> = vec![None; features.len()];
        for doc in topic_docs {
            for (id, weight) in fitted.transform(doc) {
                if weight > 0.0 {
                    let sum = sums[id].get_or_insert(0.0);
                    *sum += weight;
                }
            }
        }

        let mut buckets: [Vec<(String, f64)>; 3] = Default::default();
        for (feature, sum) in features.iter().zip(sums) {
            let (Some(sum), Some(arity)) = (sum, Arity::of(feature)) else {
                continue;
            };
            buckets[arity.n() - 1].push((feature.clone(), sum));
        }

        let mut table = TfidfScoreTable::default();
        for (arity, bucket) in Arity::ALL.into_iter().zip(buckets) {
            *table.get_mut(arity) = rank(bucket, self.top_n, None);
        }
        Ok(table)
    }

    /// One table per topic (topic documents, topic keywords excluded) plus an
    /// "All" table (every document, every topic's keywords excluded). Every
    /// call fits against the same full set of documents.
    pub fn score_by_topic(
        &self,
        normalizer: &Normalizer,
        corpus: &TopicCorpus,
    ) -> Result<TopicReport<TfidfScoreTable>> {
        let mut docs_per_topic: Vec<Vec<String>> = Vec::with_capacity(corpus.topics().len());
        for topic in corpus.topics() {
            let docs = topic
                .samples(SAMPLING_MODE)?
                .iter()
                .map(|sample| normalizer.normalize(sample).joined_unigrams())
                .collect();
            docs_per_topic.push(docs);
        }
        let all_docs: Vec<String> = docs_per_topic.iter().flatten().cloned().collect();

        let mut report = TopicReport::new();
        let mut all_keywords: Vec<String> = Vec::new();

        for (topic, docs) in corpus.topics().iter().zip(&docs_per_topic) {
            let keywords = normalizer.keywords(&topic.name);
            let table = self.score(&all_docs, docs, &keywords)?;
            debug!(
                topic = %topic.name,
                documents = docs.len(),
                unigrams = table.unigrams.len(),
                "Scored topic TF-IDF"
            );
            report.insert(topic.name.clone(), table);
            all_keywords.extend(keywords);
        }

        report.insert(ALL_TOPICS, self.score(&all_docs, &all_docs, &all_keywords)?);
        info!(
            topics = corpus.topics().len(),
            documents = all_docs.len(),
            "Scored TF-IDF terms"
        );
        Ok(report)
    }
}
