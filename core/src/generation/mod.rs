//! Text generation: the generator trait the pipeline invokes with the
//! assembled prompt, plus the bundled OpenAI implementation.

pub mod openai;

pub use openai::OpenAIGenerator;

use thiserror::Error;
use tracing::info;

use crate::config::GenerationConfig;
use crate::config::generation_api_key;
use crate::prompt::ChatMessage;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generator not available: {0}")]
    ProviderNotAvailable(String),

    #[error("request failed with status {status}: {body}")]
    RequestFailed {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("completion contained no choices")]
    EmptyCompletion,

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Trait for causal language model providers.
///
/// The pipeline hands over the ordered role-tagged messages; turning them
/// into the model's input format is the provider's concern.
#[async_trait::async_trait]
pub trait ChatGenerator: Send + Sync {
    /// Unique model identifier, e.g. "openai:gpt-4o-mini".
    fn model_id(&self) -> String;

    /// Generate a completion for the given messages.
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GenerationError>;

    /// Whether the provider can currently serve requests.
    fn is_available(&self) -> bool;
}

/// Select a generator from configuration and the `OPENAI_API_KEY`
/// environment variable. Generation has no offline fallback; a missing
/// key is an error at selection time rather than on first use.
pub fn generator_from_config(
    config: &GenerationConfig,
) -> Result<Box<dyn ChatGenerator>, GenerationError> {
    let api_key = generation_api_key().ok_or_else(|| {
        GenerationError::ProviderNotAvailable("OPENAI_API_KEY not set".to_string())
    })?;

    info!("using OpenAI generator: {}", config.model);
    let mut generator = OpenAIGenerator::new(
        api_key,
        config.model.clone(),
        config.api_endpoint.clone(),
    );
    if let Some(max_tokens) = config.max_tokens {
        generator = generator.with_max_tokens(max_tokens);
    }
    if let Some(temperature) = config.temperature {
        generator = generator.with_temperature(temperature);
    }
    Ok(Box::new(generator))
}
