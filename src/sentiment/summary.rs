// Sentiment aggregation: reduce per-sample classifications to averages.
//
// avg_pos: mean confidence of positive samples
// avg_neg: mean confidence of negative samples
// avg_all: mean of signed confidences (negatives negated)
//
// Any average over an empty set is an error rather than 0.0 or NaN.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::traits::{Sentiment, SentimentClassifier};
use crate::corpus::{TopicCorpus, ALL_TOPICS, SAMPLING_MODE};
use crate::error::{AnalysisError, Result};
use crate::report::TopicReport;

/// Average sentiment over a set of classified samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub avg_pos: f64,
    pub avg_all: f64,
    pub avg_neg: f64,
}

impl SentimentSummary {
    /// Reduce classifications to averages. Fails with EmptyInput when there
    /// are no positive samples, no negative samples, or no samples at all.
    pub fn from_sentiments(sentiments: &[Sentiment]) -> Result<Self> {
        let positive: Vec<f64> = sentiments
            .iter()
            .filter(|s| s.is_positive())
            .map(Sentiment::score)
            .collect();
        let negative: Vec<f64> = sentiments
            .iter()
            .filter(|s| !s.is_positive())
            .map(Sentiment::score)
            .collect();
        let signed: Vec<f64> = sentiments.iter().map(Sentiment::signed_score).collect();

        Ok(Self {
            avg_pos: mean(&positive, "positive")?,
            avg_all: mean(&signed, "signed")?,
            avg_neg: mean(&negative, "negative")?,
        })
    }
}

fn mean(values: &[f64], what: &str) -> Result<f64> {
    if values.is_empty() {
        return Err(AnalysisError::empty_input(what));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Classify `samples` with one blocking call to the classifier.
pub async fn classify_samples(
    classifier: &dyn SentimentClassifier,
    samples: &[String],
) -> Result<Vec<Sentiment>> {
    let sentiments = classifier
        .classify_batch(samples)
        .await
        .map_err(AnalysisError::Classifier)?;

    if sentiments.len() != samples.len() {
        return Err(AnalysisError::Classifier(anyhow::anyhow!(
            "classifier returned {} results for {} samples",
            sentiments.len(),
            samples.len()
        )));
    }
    Ok(sentiments)
}

/// One summary per topic over its "sampling" list, plus an "All" summary
/// over every topic's classifications. The first failing topic aborts the run.
pub async fn summarize_by_topic(
    classifier: &dyn SentimentClassifier,
    corpus: &TopicCorpus,
) -> Result<TopicReport<SentimentSummary>> {
    let mut report = TopicReport::new();
    let mut all_sentiments: Vec<Sentiment> = Vec::new();

    for topic in corpus.topics() {
        let samples = topic.samples(SAMPLING_MODE)?;
        let sentiments = classify_samples(classifier, samples).await?;

        let summary = SentimentSummary::from_sentiments(&sentiments)?;
        debug!(
            topic = %topic.name,
            samples = samples.len(),
            avg_all = summary.avg_all,
            "Summarized topic sentiment"
        );
        report.insert(topic.name.clone(), summary);
        all_sentiments.extend(sentiments);
    }

    report.insert(ALL_TOPICS, SentimentSummary::from_sentiments(&all_sentiments)?);
    info!(
        topics = corpus.topics().len(),
        samples = all_sentiments.len(),
        "Summarized sentiment"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_averages() {
        let sentiments = vec![
            Sentiment::Positive(0.9),
            Sentiment::Positive(0.7),
            Sentiment::Negative(0.6),
        ];
        let summary = SentimentSummary::from_sentiments(&sentiments).unwrap();
        assert!((summary.avg_pos - 0.8).abs() < 1e-12);
        assert!((summary.avg_neg - 0.6).abs() < 1e-12);
        assert!((summary.avg_all - (0.9 + 0.7 - 0.6) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_is_error() {
        let err = SentimentSummary::from_sentiments(&[]).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput { .. }));
    }

    #[test]
    fn test_missing_label_is_error() {
        let err = SentimentSummary::from_sentiments(&[Sentiment::Positive(0.9)]).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput { ref what } if what == "negative"));
    }

    #[test]
    fn test_summary_field_order() {
        let summary = SentimentSummary {
            avg_pos: 0.5,
            avg_all: 0.0,
            avg_neg: 0.5,
        };
        assert_eq!(
            serde_json::to_string(&summary).unwrap(),
            r#"{"avg_pos":0.5,"avg_all":0.0,"avg_neg":0.5}"#
        );
    }
}
