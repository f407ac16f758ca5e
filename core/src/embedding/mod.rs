//! Text embedding: the provider trait retrieval depends on, the bundled
//! implementations, and key-driven provider selection.

pub mod providers;

pub use providers::HashProvider;
pub use providers::OpenAIProvider;

use thiserror::Error;
use tracing::info;
use tracing::warn;

use crate::config::EmbeddingConfig;
use crate::config::EmbeddingProviderKind;
use crate::config::embedding_api_key;

/// A single embedding vector.
pub type EmbeddingVector = Vec<f32>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("provider returned {actual} vectors for {expected} inputs")]
    BatchSizeMismatch { expected: usize, actual: usize },

    #[error("provider error: {0}")]
    Provider(String),
}

/// Trait for embedding providers.
///
/// Implementations map text to fixed-dimension vectors. Every vector a
/// provider returns must have [`Self::dimensions`] entries, and batch
/// output must line up with batch input one-to-one, in order.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Unique model identifier, e.g. "openai:text-embedding-3-small".
    fn model_id(&self) -> String;

    /// Vector dimensionality produced by this provider.
    fn dimensions(&self) -> usize;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError>;

    /// Embed multiple texts, one vector per input, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError>;

    /// Whether the provider can currently serve requests.
    fn is_available(&self) -> bool;
}

/// Select an embedding provider from configuration and environment keys.
///
/// `auto` prefers the OpenAI provider when an API key is present and
/// otherwise falls back to the deterministic hash provider, which needs no
/// credentials. Forcing `openai` without a key is an error.
pub fn provider_from_config(
    config: &EmbeddingConfig,
) -> Result<Box<dyn EmbeddingProvider>, EmbeddingError> {
    match config.provider {
        EmbeddingProviderKind::OpenAI => {
            let api_key = embedding_api_key().ok_or_else(|| {
                EmbeddingError::ProviderNotAvailable(
                    "OPENAI_EMBEDDING_KEY or OPENAI_API_KEY not set".to_string(),
                )
            })?;
            info!("using OpenAI embedding provider: {}", config.model);
            Ok(Box::new(OpenAIProvider::new(
                api_key,
                config.model.clone(),
                config.dimensions,
                config.api_endpoint.clone(),
            )))
        }
        EmbeddingProviderKind::Hash => {
            let dimensions = config.dimensions.unwrap_or(HashProvider::DEFAULT_DIMENSIONS);
            info!("using hash embedding provider with {dimensions} dimensions");
            Ok(Box::new(HashProvider::new(dimensions)))
        }
        EmbeddingProviderKind::Auto => match embedding_api_key() {
            Some(api_key) => {
                info!("auto-selected OpenAI embedding provider: {}", config.model);
                Ok(Box::new(OpenAIProvider::new(
                    api_key,
                    config.model.clone(),
                    config.dimensions,
                    config.api_endpoint.clone(),
                )))
            }
            None => {
                let dimensions = config.dimensions.unwrap_or(HashProvider::DEFAULT_DIMENSIONS);
                warn!("no embedding API key found, falling back to the hash provider");
                Ok(Box::new(HashProvider::new(dimensions)))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_hash_selection_never_needs_a_key() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderKind::Hash,
            dimensions: Some(16),
            ..EmbeddingConfig::default()
        };

        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.dimensions(), 16);
        assert!(provider.is_available());
    }

    #[test]
    fn hash_selection_defaults_dimensions() {
        let config = EmbeddingConfig {
            provider: EmbeddingProviderKind::Hash,
            ..EmbeddingConfig::default()
        };

        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.dimensions(), HashProvider::DEFAULT_DIMENSIONS);
    }
}
