// Sentiment classifier trait.
//
// The analysis core only needs "text in, positive/negative with a confidence
// out". The default implementation runs a local ONNX model; a hosted
// inference API is available as an alternative.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Binary sentiment label carrying the classifier's confidence (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "label", content = "score", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Positive(f64),
    Negative(f64),
}

impl Sentiment {
    /// Confidence in the assigned label.
    pub fn score(&self) -> f64 {
        match *self {
            Sentiment::Positive(score) | Sentiment::Negative(score) => score,
        }
    }

    /// Confidence with direction: positive as-is, negative negated.
    pub fn signed_score(&self) -> f64 {
        match *self {
            Sentiment::Positive(score) => score,
            Sentiment::Negative(score) => -score,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Sentiment::Positive(_))
    }

    /// Build from a model label such as "POSITIVE" / "NEGATIVE" (or the
    /// generic "LABEL_1" / "LABEL_0"). Unknown labels are rejected.
    pub fn from_label(label: &str, score: f64) -> Result<Self> {
        match label.to_ascii_uppercase().as_str() {
            "POSITIVE" | "POS" | "LABEL_1" => Ok(Sentiment::Positive(score)),
            "NEGATIVE" | "NEG" | "LABEL_0" => Ok(Sentiment::Negative(score)),
            other => anyhow::bail!("Unknown sentiment label: {other}"),
        }
    }
}

/// Trait for classifying text sentiment. Async because backends either call
/// a remote API or offload model inference to a blocking thread.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify a single text.
    async fn classify(&self, text: &str) -> Result<Sentiment>;

    /// Classify multiple texts, returning results in the same order.
    /// Calls `classify` sequentially unless the backend overrides it.
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Sentiment>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.classify(text).await?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_score() {
        assert_eq!(Sentiment::Positive(0.9).signed_score(), 0.9);
        assert_eq!(Sentiment::Negative(0.8).signed_score(), -0.8);
        assert_eq!(Sentiment::Negative(0.8).score(), 0.8);
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Sentiment::from_label("POSITIVE", 0.7).unwrap(), Sentiment::Positive(0.7));
        assert_eq!(Sentiment::from_label("negative", 0.6).unwrap(), Sentiment::Negative(0.6));
        assert_eq!(Sentiment::from_label("LABEL_1", 0.5).unwrap(), Sentiment::Positive(0.5));
        assert!(Sentiment::from_label("NEUTRAL", 0.5).is_err());
    }

    #[test]
    fn test_serializes_like_classifier_output() {
        let json = serde_json::to_string(&Sentiment::Negative(0.25)).unwrap();
        assert_eq!(json, r#"{"label":"NEGATIVE","score":0.25}"#);
    }
}
