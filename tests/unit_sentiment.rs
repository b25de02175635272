// Unit tests for sentiment aggregation.
//
// A keyword-driven fake classifier stands in for the model backends so the
// averaging and per-topic reporting can be checked exactly.

use anyhow::Result;
use async_trait::async_trait;

use genlex::corpus::{TopicCorpus, TopicSamples, ALL_TOPICS};
use genlex::error::AnalysisError;
use genlex::sentiment::summary::{classify_samples, summarize_by_topic, SentimentSummary};
use genlex::sentiment::traits::{Sentiment, SentimentClassifier};

/// Texts containing "bad" are negative, everything else positive. The
/// confidence is read from a trailing "@0.NN" marker when present.
struct KeywordClassifier;

#[async_trait]
impl SentimentClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<Sentiment> {
        let score = text
            .rsplit_once('@')
            .and_then(|(_, s)| s.parse::<f64>().ok())
            .unwrap_or(0.9);
        if text.contains("bad") {
            Ok(Sentiment::Negative(score))
        } else {
            Ok(Sentiment::Positive(score))
        }
    }
}

/// Always fails.
struct BrokenClassifier;

#[async_trait]
impl SentimentClassifier for BrokenClassifier {
    async fn classify(&self, _text: &str) -> Result<Sentiment> {
        anyhow::bail!("model not loaded")
    }
}

/// Drops the last result of every batch.
struct ShortClassifier;

#[async_trait]
impl SentimentClassifier for ShortClassifier {
    async fn classify(&self, _text: &str) -> Result<Sentiment> {
        Ok(Sentiment::Positive(0.5))
    }

    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Sentiment>> {
        Ok(texts.iter().skip(1).map(|_| Sentiment::Positive(0.5)).collect())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

// ============================================================
// Averages
// ============================================================

#[test]
fn averages_follow_label_groups() {
    let summary = SentimentSummary::from_sentiments(&[
        Sentiment::Positive(0.9),
        Sentiment::Negative(0.8),
    ])
    .unwrap();
    assert_close(summary.avg_pos, 0.9);
    assert_close(summary.avg_neg, 0.8);
    assert_close(summary.avg_all, 0.05);
}

#[test]
fn avg_all_is_weighted_difference_of_groups() {
    let sentiments = vec![
        Sentiment::Positive(0.99),
        Sentiment::Positive(0.61),
        Sentiment::Positive(0.75),
        Sentiment::Negative(0.88),
        Sentiment::Negative(0.52),
    ];
    let summary = SentimentSummary::from_sentiments(&sentiments).unwrap();
    let (p, n) = (3.0, 2.0);
    assert_close(summary.avg_all, (p * summary.avg_pos - n * summary.avg_neg) / (p + n));
}

#[test]
fn all_positive_is_empty_input() {
    let err = SentimentSummary::from_sentiments(&[Sentiment::Positive(0.7), Sentiment::Positive(0.8)])
        .unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyInput { .. }));
}

#[test]
fn all_negative_is_empty_input() {
    let err = SentimentSummary::from_sentiments(&[Sentiment::Negative(0.7)]).unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyInput { ref what } if what == "positive"));
}

// ============================================================
// Classification boundary
// ============================================================

#[tokio::test]
async fn classify_samples_preserves_order() {
    let samples = strings(&["good day@0.7", "bad day@0.6", "fine@0.8"]);
    let sentiments = classify_samples(&KeywordClassifier, &samples).await.unwrap();
    assert_eq!(
        sentiments,
        vec![
            Sentiment::Positive(0.7),
            Sentiment::Negative(0.6),
            Sentiment::Positive(0.8),
        ]
    );
}

#[tokio::test]
async fn classifier_failure_is_wrapped() {
    let err = classify_samples(&BrokenClassifier, &strings(&["anything"]))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Classifier(_)));
    assert!(err.to_string().contains("model not loaded"));
}

#[tokio::test]
async fn short_batch_is_classifier_error() {
    let err = classify_samples(&ShortClassifier, &strings(&["a", "b"]))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Classifier(_)));
}

// ============================================================
// Per-topic report
// ============================================================

#[tokio::test]
async fn report_has_topic_and_all_summaries() {
    let corpus = TopicCorpus::new(vec![
        TopicSamples::with_sampling("Sports", strings(&["great win@0.9", "bad loss@0.8"])),
        TopicSamples::with_sampling(
            "Weather",
            strings(&["sunny@0.6", "bad storm@0.4", "bad flood@0.6"]),
        ),
    ])
    .unwrap();

    let report = summarize_by_topic(&KeywordClassifier, &corpus).await.unwrap();
    let keys: Vec<&str> = report.keys().collect();
    assert_eq!(keys, vec!["Sports", "Weather", ALL_TOPICS]);

    let sports = report.get("Sports").unwrap();
    assert_close(sports.avg_pos, 0.9);
    assert_close(sports.avg_neg, 0.8);
    assert_close(sports.avg_all, 0.05);

    let weather = report.get("Weather").unwrap();
    assert_close(weather.avg_pos, 0.6);
    assert_close(weather.avg_neg, 0.5);
    assert_close(weather.avg_all, (0.6 - 0.4 - 0.6) / 3.0);

    let all = report.all().unwrap();
    assert_close(all.avg_pos, 0.75);
    assert_close(all.avg_neg, 0.6);
    assert_close(all.avg_all, (0.9 - 0.8 + 0.6 - 0.4 - 0.6) / 5.0);
}

#[tokio::test]
async fn one_sided_topic_aborts_report() {
    let corpus = TopicCorpus::new(vec![
        TopicSamples::with_sampling("Mixed", strings(&["good", "bad"])),
        TopicSamples::with_sampling("Happy", strings(&["good", "great"])),
    ])
    .unwrap();

    let err = summarize_by_topic(&KeywordClassifier, &corpus).await.unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyInput { .. }));
}

#[tokio::test]
async fn empty_topic_aborts_report() {
    let corpus = TopicCorpus::new(vec![TopicSamples::with_sampling("Nothing", vec![])]).unwrap();
    let err = summarize_by_topic(&KeywordClassifier, &corpus).await.unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyInput { .. }));
}

#[tokio::test]
async fn failing_classifier_aborts_report() {
    let corpus = TopicCorpus::new(vec![TopicSamples::with_sampling("Sports", strings(&["win"]))])
        .unwrap();
    let err = summarize_by_topic(&BrokenClassifier, &corpus).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Classifier(_)));
}
