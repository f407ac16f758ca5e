//! OpenAI embeddings API provider.

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::embedding::EmbeddingError;
use crate::embedding::EmbeddingProvider;
use crate::embedding::EmbeddingVector;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";

/// The embeddings API caps inputs per request.
const MAX_BATCH_SIZE: usize = 2048;

/// Embedding provider backed by the OpenAI embeddings API.
pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: Option<usize>,
    endpoint: String,
}

impl OpenAIProvider {
    /// Create a provider for `model`.
    ///
    /// `dimensions` overrides the output dimensionality for models that
    /// support shortened embeddings; `None` keeps the model default.
    /// `endpoint` points at a compatible proxy; `None` uses the OpenAI API.
    pub fn new(
        api_key: String,
        model: String,
        dimensions: Option<usize>,
        endpoint: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            dimensions,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        }
    }

    async fn request_batch(
        &self,
        texts: &[String],
    ) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        let request = EmbeddingsRequest {
            model: &self.model,
            input: texts,
            dimensions: self.dimensions,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::ApiError(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| format!("{}: {}", e.error.error_type, e.error.message))
                .unwrap_or(body);
            return Err(EmbeddingError::ApiError(format!("{status}: {detail}")));
        }

        let parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::ApiError(format!("invalid response: {e}")))?;

        if parsed.data.len() != texts.len() {
            return Err(EmbeddingError::BatchSizeMismatch {
                expected: texts.len(),
                actual: parsed.data.len(),
            });
        }

        // The API may return entries out of order; restore input order.
        let mut data = parsed.data;
        data.sort_by_key(|d| d.index);

        let expected = self.dimensions();
        let mut vectors = Vec::with_capacity(data.len());
        for entry in data {
            if entry.embedding.len() != expected {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: entry.embedding.len(),
                });
            }
            vectors.push(entry.embedding);
        }
        Ok(vectors)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn model_id(&self) -> String {
        format!("openai:{}", self.model)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
            .unwrap_or_else(|| match self.model.as_str() {
                "text-embedding-3-small" => 1536,
                "text-embedding-3-large" => 3072,
                "text-embedding-ada-002" => 1536,
                _ => 1536,
            })
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors.pop().ok_or(EmbeddingError::BatchSizeMismatch {
            expected: 1,
            actual: 0,
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(MAX_BATCH_SIZE) {
            debug!("embedding batch of {} texts via {}", chunk.len(), self.model);
            vectors.extend(self.request_batch(chunk).await?);
        }
        Ok(vectors)
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingEntry>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingEntry {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}
