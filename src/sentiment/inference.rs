// Hosted inference API classifier.
//
// Sends texts to a hosted text-classification endpoint (HuggingFace
// Inference by default) and keeps the highest-scoring label per text.
// Requests are batched and spaced by a rate limiter.
//
// Response shapes seen in practice:
//   [[{"label": "POSITIVE", "score": 0.99}, {"label": "NEGATIVE", ...}], ...]
//   [{"label": "POSITIVE", "score": 0.99}, ...]        (one entry per input)

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rate_limiter::RateLimiter;
use super::traits::{Sentiment, SentimentClassifier};

/// Texts sent per request.
const BATCH_SIZE: usize = 16;

/// Hosted inference API sentiment classifier.
pub struct InferenceApiClassifier {
    client: Client,
    endpoint: String,
    api_token: String,
    rate_limiter: RateLimiter,
}

impl InferenceApiClassifier {
    /// Create a classifier for `model` served under `base_url`.
    pub fn new(base_url: &str, model: &str, api_token: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), model),
            api_token,
            // Stay well under free-tier burst limits
            rate_limiter: RateLimiter::new(2.0),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post_batch(&self, texts: &[String]) -> Result<Vec<Sentiment>> {
        self.rate_limiter.acquire().await;

        let request = InferenceRequest {
            inputs: texts,
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await
            .context("Failed to call inference API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Inference API returned {}: {}", status, body);
        }

        let parsed: InferenceResponse = response
            .json()
            .await
            .context("Failed to parse inference API response")?;

        let sentiments = top_sentiments(parsed, texts.len())?;
        debug!(batch = texts.len(), endpoint = %self.endpoint, "Classified batch");
        Ok(sentiments)
    }
}

#[async_trait]
impl SentimentClassifier for InferenceApiClassifier {
    async fn classify(&self, text: &str) -> Result<Sentiment> {
        let mut results = self.post_batch(&[text.to_string()]).await?;
        results.pop().context("Inference API returned no result")
    }

    async fn classify_batch(&self, texts: &[String]) -> Result<Vec<Sentiment>> {
        let mut results = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(BATCH_SIZE) {
            results.extend(self.post_batch(chunk).await?);
        }
        Ok(results)
    }
}

/// Reduce a response to one sentiment per input, keeping the top label.
fn top_sentiments(response: InferenceResponse, expected: usize) -> Result<Vec<Sentiment>> {
    let rows: Vec<Vec<LabelScore>> = match response {
        InferenceResponse::Nested(rows) => rows,
        InferenceResponse::Flat(entries) => entries.into_iter().map(|e| vec![e]).collect(),
    };

    if rows.len() != expected {
        anyhow::bail!(
            "Inference API returned {} results for {} inputs",
            rows.len(),
            expected
        );
    }

    rows.into_iter()
        .map(|row| {
            let best = row
                .into_iter()
                .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
                .context("Inference API returned an empty label list")?;
            Sentiment::from_label(&best.label, best.score)
        })
        .collect()
}

// --- Inference API request/response types ---

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a [String],
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}
