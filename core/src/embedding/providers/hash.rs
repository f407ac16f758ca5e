//! Deterministic hash-based embedding provider.
//!
//! Maps text to reproducible vectors without a network call or a model.
//! The vectors carry no semantic signal, but identical inputs always
//! produce identical outputs, which is what offline runs and tests need.

use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use crate::embedding::EmbeddingError;
use crate::embedding::EmbeddingProvider;
use crate::embedding::EmbeddingVector;

pub struct HashProvider {
    dimensions: usize,
}

impl HashProvider {
    pub const DEFAULT_DIMENSIONS: usize = 256;

    pub const fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn vector_for(&self, text: &str) -> EmbeddingVector {
        let mut vector = Vec::with_capacity(self.dimensions);
        for i in 0..self.dimensions {
            let mut hasher = DefaultHasher::new();
            text.hash(&mut hasher);
            i.hash(&mut hasher);
            let hash = hasher.finish();
            // One byte of the hash, scaled into [-1.0, 1.0].
            let byte = ((hash >> ((i % 8) * 8)) & 0xFF) as f32;
            vector.push(byte / 127.5 - 1.0);
        }
        vector
    }
}

impl Default for HashProvider {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSIONS)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashProvider {
    fn model_id(&self) -> String {
        format!("hash:deterministic-{}", self.dimensions)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.vector_for(text)).collect())
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn same_text_always_embeds_identically() {
        let provider = HashProvider::default();
        let first = provider.embed("the quick brown fox").await.unwrap();
        let second = provider.embed("the quick brown fox").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn different_texts_embed_differently() {
        let provider = HashProvider::default();
        let alpha = provider.embed("alpha").await.unwrap();
        let beta = provider.embed("beta").await.unwrap();
        assert_ne!(alpha, beta);
    }

    #[tokio::test]
    async fn vectors_have_configured_dimensions_and_bounded_values() {
        let provider = HashProvider::new(32);
        let vector = provider.embed("bounded").await.unwrap();

        assert_eq!(vector.len(), 32);
        assert!(vector.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[tokio::test]
    async fn batch_matches_single_embeds() {
        let provider = HashProvider::new(64);
        let texts = vec!["one".to_string(), "two".to_string()];

        let batch = provider.embed_batch(&texts).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], provider.embed("one").await.unwrap());
        assert_eq!(batch[1], provider.embed("two").await.unwrap());
    }
}
