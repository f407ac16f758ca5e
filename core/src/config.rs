//! Workspace configuration: provider selection, model names, retrieval
//! depth. Read from `~/.ragline/config.toml`, with environment variables
//! supplying credentials.

use std::env;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration. Every field has a default, so an empty or
/// absent file yields a working setup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaglineConfig {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl RaglineConfig {
    /// Load from `path` when given, otherwise from the default location.
    ///
    /// An explicit path must exist and parse. The default location is
    /// permissive: an absent file yields defaults, and a malformed one is
    /// logged and ignored rather than failing startup.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let Some(default_path) = default_config_path() else {
            return Ok(Self::default());
        };
        if !default_path.exists() {
            debug!("no config at {}, using defaults", default_path.display());
            return Ok(Self::default());
        }
        match Self::from_file(&default_path) {
            Ok(config) => Ok(config),
            Err(err) => {
                warn!(
                    "ignoring malformed config at {}: {err}",
                    default_path.display()
                );
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// `~/.ragline/config.toml`, when a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ragline").join("config.toml"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider selection strategy.
    #[serde(default)]
    pub provider: EmbeddingProviderKind,
    /// Model for the OpenAI provider.
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Output dimensionality override; also sizes the hash provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
    /// Custom API endpoint, e.g. a proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            model: default_embedding_model(),
            dimensions: None,
            api_endpoint: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// OpenAI when a key is present, hash otherwise.
    #[default]
    Auto,
    OpenAI,
    Hash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_generation_model")]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_generation_model(),
            api_endpoint: None,
            max_tokens: None,
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Snippets returned per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_generation_model() -> String {
    "gpt-4o-mini".to_string()
}

const fn default_top_k() -> usize {
    1
}

/// API key for the embedding side. `OPENAI_EMBEDDING_KEY` keeps embedding
/// billing separate from chat; `OPENAI_API_KEY` is the fallback. A variable
/// set to the empty string counts as unset.
pub fn embedding_api_key() -> Option<String> {
    non_empty_env("OPENAI_EMBEDDING_KEY").or_else(|| non_empty_env("OPENAI_API_KEY"))
}

/// API key for the generation side.
pub fn generation_api_key() -> Option<String> {
    non_empty_env("OPENAI_API_KEY")
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
