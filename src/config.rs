use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::ngrams::frequency::FrequencyCounter;
use crate::ngrams::tfidf::TfIdfScorer;

/// Default hosted inference endpoint (model id is appended).
pub const DEFAULT_INFERENCE_URL: &str = "https://router.huggingface.co/hf-inference/models";

/// Default hosted sentiment model.
pub const DEFAULT_INFERENCE_MODEL: &str = "siebert/sentiment-roberta-large-english";

/// Which sentiment classifier backend to use.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierBackend {
    /// Local ONNX model (default)
    Onnx,
    /// Hosted inference API, requires HF_API_TOKEN
    Inference,
}

/// Ranking parameters shared by the n-gram analyses.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParams {
    /// Entries kept per arity
    pub top_n: usize,
    /// Minimum count for frequency entries
    pub min_freq: u64,
    /// TF-IDF vocabulary cap
    pub max_features: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            top_n: 20,
            min_freq: 2,
            max_features: 5000,
        }
    }
}

impl AnalysisParams {
    pub fn frequency_counter(&self) -> FrequencyCounter {
        FrequencyCounter::new(self.top_n, self.min_freq)
    }

    pub fn tfidf_scorer(&self) -> TfIdfScorer {
        TfIdfScorer::new(self.top_n, self.max_features)
    }
}

/// Central configuration loaded from environment variables.
///
/// Secrets come from env vars (never hardcoded). The .env file is loaded
/// at startup via dotenvy.
pub struct Config {
    /// Which sentiment classifier to use (default: Onnx)
    pub classifier_backend: ClassifierBackend,
    /// Directory containing the ONNX model files
    pub model_dir: PathBuf,
    /// Hosted inference base URL
    pub inference_url: String,
    /// Hosted inference model id
    pub inference_model: String,
    pub hf_api_token: String,
    pub params: AnalysisParams,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the API token, which only the
    /// inference backend needs.
    pub fn load() -> Result<Self> {
        let classifier_backend = match env::var("GENLEX_CLASSIFIER").as_deref() {
            Ok("inference") => ClassifierBackend::Inference,
            Ok("onnx") | Err(_) => ClassifierBackend::Onnx,
            Ok(other) => anyhow::bail!(
                "Unknown GENLEX_CLASSIFIER value {other:?} (expected \"onnx\" or \"inference\")"
            ),
        };

        let model_dir = env::var("GENLEX_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::sentiment::download::default_model_dir());

        let defaults = AnalysisParams::default();
        let params = AnalysisParams {
            top_n: env_number("GENLEX_TOP_N", defaults.top_n)?,
            min_freq: env_number("GENLEX_MIN_FREQ", defaults.min_freq)?,
            max_features: env_number("GENLEX_MAX_FEATURES", defaults.max_features)?,
        };

        Ok(Self {
            classifier_backend,
            model_dir,
            inference_url: env::var("GENLEX_INFERENCE_URL")
                .unwrap_or_else(|_| DEFAULT_INFERENCE_URL.to_string()),
            inference_model: env::var("GENLEX_INFERENCE_MODEL")
                .unwrap_or_else(|_| DEFAULT_INFERENCE_MODEL.to_string()),
            hf_api_token: env::var("HF_API_TOKEN").unwrap_or_default(),
            params,
        })
    }

    /// Validate that the chosen classifier backend has what it needs.
    /// For ONNX: model files must exist (or user should run download-model).
    /// For Inference: API token must be set.
    pub fn require_classifier(&self) -> Result<()> {
        match self.classifier_backend {
            ClassifierBackend::Onnx => {
                if !crate::sentiment::download::model_files_present(&self.model_dir) {
                    anyhow::bail!(
                        "ONNX model files not found in {}\n\
                         Run `genlex download-model` to download them.\n\
                         Or set GENLEX_CLASSIFIER=inference to use the hosted inference API instead.",
                        self.model_dir.display()
                    );
                }
                Ok(())
            }
            ClassifierBackend::Inference => {
                if self.hf_api_token.is_empty() {
                    anyhow::bail!(
                        "HF_API_TOKEN not set. Add it to your .env file to use the inference backend."
                    );
                }
                Ok(())
            }
        }
    }
}

/// Read a numeric env var, falling back to `default` when unset.
fn env_number<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got {raw:?}")),
        Err(_) => Ok(default),
    }
}
