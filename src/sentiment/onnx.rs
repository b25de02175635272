// Local ONNX sentiment classifier using DistilBERT fine-tuned on SST-2.
//
// Runs on the local CPU with no network access. The model is loaded once
// and the same classifier is reused for every topic.
//
// Model: distilbert-base-uncased-finetuned-sst-2-english (ONNX export)
// Output: 2 logits per text, [NEGATIVE, POSITIVE]; softmax gives confidence.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::debug;

use super::download::{MODEL_FILE, TOKENIZER_FILE};
use super::traits::{Sentiment, SentimentClassifier};

/// Longest token sequence the model accepts.
const MAX_TOKENS: usize = 512;

/// Pad token id for BERT-family vocabularies.
const PAD_ID: i64 = 0;

/// Local ONNX-based sentiment classifier. Holds the model session and
/// tokenizer behind Arc<Mutex> so inference can be offloaded to
/// spawn_blocking without blocking the async runtime.
pub struct OnnxSentimentClassifier {
    // ort::Session::run takes &mut self; spawn_blocking needs 'static.
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl OnnxSentimentClassifier {
    /// Load the ONNX model and tokenizer from the given directory.
    ///
    /// Expects `model.onnx` and `tokenizer.json` to exist in `model_dir`.
    /// Call `download::download_model()` first if they don't.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join(MODEL_FILE);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);

        if !model_path.exists() {
            anyhow::bail!(
                "Model file not found: {}\nRun `genlex download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Tokenizer file not found: {}\nRun `genlex download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        debug!("Loaded ONNX sentiment model from {}", model_dir.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl SentimentClassifier for OnnxSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<Sentiment> {
        let mut results = self.classify_batch(&[text.to_string()]).await?;
        results
            .pop()
            .context("ONNX classifier returned no result")
    }

    /// True batch inference: tokenize all texts, run one forward pass,
    /// softmax the two logits per row and keep the winning label.
    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Sentiment>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            let encodings: Vec<_> = texts
                .iter()
                .map(|t| {
                    tokenizer
                        .encode(t.as_str(), true)
                        .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
                })
                .collect::<Result<Vec<_>>>()?;

            let batch_size = encodings.len();
            let max_len = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);

            // Right-padded flat inputs, shape [batch_size, max_len].
            let mut input_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
            let mut attention_mask_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);

            for enc in &encodings {
                let ids = enc.get_ids();
                input_ids_flat.extend(ids.iter().map(|&id| id as i64));
                attention_mask_flat.extend(enc.get_attention_mask().iter().map(|&m| m as i64));
                for _ in ids.len()..max_len {
                    input_ids_flat.push(PAD_ID);
                    attention_mask_flat.push(0);
                }
            }

            let shape = [batch_size as i64, max_len as i64];
            let input_ids_tensor = Tensor::from_array((shape, input_ids_flat))
                .context("Failed to create input_ids tensor")?;
            let attention_mask_tensor = Tensor::from_array((shape, attention_mask_flat))
                .context("Failed to create attention_mask tensor")?;

            let logits = {
                let mut session = session
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

                let outputs = session
                    .run(ort::inputs! {
                        "input_ids" => input_ids_tensor,
                        "attention_mask" => attention_mask_tensor
                    })
                    .context("ONNX inference failed")?;

                // Output shape: [batch_size, 2] raw logits
                let (_out_shape, data) = outputs[0]
                    .try_extract_tensor::<f32>()
                    .context("Failed to extract output tensor")?;

                data.to_vec()
            };

            if logits.len() != batch_size * 2 {
                anyhow::bail!(
                    "Unexpected model output size {} for batch of {}",
                    logits.len(),
                    batch_size
                );
            }

            let mut results = Vec::with_capacity(batch_size);
            for (row, text) in logits.chunks_exact(2).zip(&texts) {
                let sentiment = sentiment_from_logits(row[0] as f64, row[1] as f64);
                debug!(
                    sentiment = ?sentiment,
                    text_preview = %crate::output::truncate_chars(text, 50),
                    "ONNX classified text"
                );
                results.push(sentiment);
            }
            Ok(results)
        })
        .await
        .context("spawn_blocking panicked")?
    }
}

/// Softmax over [negative, positive] logits; the larger side wins.
fn sentiment_from_logits(negative: f64, positive: f64) -> Sentiment {
    let max = negative.max(positive);
    let neg_exp = (negative - max).exp();
    let pos_exp = (positive - max).exp();
    let total = neg_exp + pos_exp;

    if pos_exp >= neg_exp {
        Sentiment::Positive(pos_exp / total)
    } else {
        Sentiment::Negative(neg_exp / total)
    }
}
