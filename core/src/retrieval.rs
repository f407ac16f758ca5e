//! Query-to-snippet retrieval over an embedded corpus.

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing::info;

use crate::corpus::SnippetCorpus;
use crate::embedding::EmbeddingError;
use crate::embedding::EmbeddingProvider;
use crate::index::IndexError;
use crate::index::VectorIndex;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("search returned position {position} outside corpus of {corpus_len} snippets")]
    PositionOutOfRange { position: usize, corpus_len: usize },
}

/// A snippet matched by a query, with its corpus position and distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedSnippet {
    pub position: usize,
    pub text: String,
    /// Squared Euclidean distance between query and snippet embeddings.
    pub distance: f32,
}

/// Retrieves the most relevant corpus snippets for a query.
///
/// Construction embeds the whole corpus in one batch call and indexes the
/// vectors in corpus order, so the one-vector-per-snippet correspondence
/// holds by position. After that the retriever is read-only; each query
/// embeds the query text and linearly scans the index.
pub struct Retriever {
    embedder: Box<dyn EmbeddingProvider>,
    index: VectorIndex,
    corpus: SnippetCorpus,
}

impl Retriever {
    /// Embed `corpus` with `embedder` and build the index over it.
    ///
    /// Fails if the provider returns a vector count different from the
    /// corpus length or vectors of mixed dimensionality.
    pub async fn build(
        embedder: Box<dyn EmbeddingProvider>,
        corpus: SnippetCorpus,
    ) -> Result<Self, RetrievalError> {
        let vectors = embedder.embed_batch(corpus.texts()).await?;
        if vectors.len() != corpus.len() {
            return Err(EmbeddingError::BatchSizeMismatch {
                expected: corpus.len(),
                actual: vectors.len(),
            }
            .into());
        }

        let index = VectorIndex::build(vectors)?;
        info!(
            "built retrieval index: {} snippets, {} dimensions, model {}",
            corpus.len(),
            index.dimensions(),
            embedder.model_id()
        );

        Ok(Self {
            embedder,
            index,
            corpus,
        })
    }

    /// The single nearest snippet for `query`.
    pub async fn retrieve(&self, query: &str) -> Result<RetrievedSnippet, RetrievalError> {
        self.retrieve_k(query, 1)
            .await?
            .into_iter()
            .next()
            .ok_or(RetrievalError::Index(IndexError::EmptyIndex))
    }

    /// The `k` nearest snippets for `query`, ascending by distance.
    ///
    /// Fewer than `k` snippets are returned when the corpus is smaller
    /// than `k`; an empty corpus is an error, never an empty result.
    pub async fn retrieve_k(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedSnippet>, RetrievalError> {
        let query_vector = self.embedder.embed(query).await?;
        let neighbors = self.index.search(&query_vector, k)?;
        debug!("query matched {} of {} snippets", neighbors.len(), self.corpus.len());

        neighbors
            .into_iter()
            .map(|neighbor| {
                let text = self.corpus.get(neighbor.position).ok_or(
                    RetrievalError::PositionOutOfRange {
                        position: neighbor.position,
                        corpus_len: self.corpus.len(),
                    },
                )?;
                Ok(RetrievedSnippet {
                    position: neighbor.position,
                    text: text.to_string(),
                    distance: neighbor.distance,
                })
            })
            .collect()
    }

    pub fn corpus(&self) -> &SnippetCorpus {
        &self.corpus
    }

    pub fn model_id(&self) -> String {
        self.embedder.model_id()
    }
}
