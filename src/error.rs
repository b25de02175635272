// Error taxonomy for the analysis core.
//
// Pure computations (normalization, counting, TF-IDF, sentiment averaging)
// and corpus load/save return AnalysisError. Classifier backends are
// external capabilities and speak anyhow; their failures are wrapped in
// AnalysisError::Classifier at the aggregation boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The input document does not have the expected topic/mode/sample shape.
    #[error("Malformed input for topic {topic:?}: {message}")]
    MalformedInput { topic: String, message: String },

    /// An average was requested over an empty set of values.
    #[error("Empty input: no {what} values to average")]
    EmptyInput { what: String },

    /// TF-IDF fit produced no features (every document empty or only stop terms).
    #[error("Empty vocabulary: documents contain no features after stop-term removal")]
    EmptyVocabulary,

    /// The sentiment classifier failed. Fatal for the run.
    #[error("Sentiment classifier failed: {0:#}")]
    Classifier(anyhow::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    pub fn malformed(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            topic: topic.into(),
            message: message.into(),
        }
    }

    pub fn empty_input(what: impl Into<String>) -> Self {
        Self::EmptyInput { what: what.into() }
    }
}
