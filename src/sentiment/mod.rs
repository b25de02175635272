// Sentiment analysis: trait-based classifier abstraction plus aggregation.
//
// The SentimentClassifier trait defines the capability. OnnxSentimentClassifier
// runs a local model; InferenceApiClassifier calls a hosted endpoint. The
// summary module reduces classifications to per-topic averages without caring
// which backend produced them.

pub mod download;
pub mod inference;
pub mod onnx;
pub mod rate_limiter;
pub mod summary;
pub mod traits;
