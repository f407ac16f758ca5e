//! End-to-end retrieval-augmented generation.

use thiserror::Error;
use tracing::debug;

use crate::corpus::SnippetCorpus;
use crate::embedding::EmbeddingProvider;
use crate::generation::ChatGenerator;
use crate::generation::GenerationError;
use crate::prompt::build_rag_prompt;
use crate::retrieval::RetrievalError;
use crate::retrieval::RetrievedSnippet;
use crate::retrieval::Retriever;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),
}

/// A grounded answer: the generated text plus the snippet it was
/// conditioned on.
#[derive(Debug, Clone, PartialEq)]
pub struct RagAnswer {
    pub text: String,
    pub context: RetrievedSnippet,
}

/// Single-shot retrieval-augmented generation over a fixed corpus.
///
/// Each [`Self::answer`] call runs the strictly linear flow: embed the
/// query, scan the index, take the top snippet, format the two-message
/// prompt, generate. One collaborator request is outstanding at a time
/// and nothing is retried or streamed.
pub struct RagPipeline {
    retriever: Retriever,
    generator: Box<dyn ChatGenerator>,
}

impl RagPipeline {
    /// Embed `corpus` and assemble the pipeline around it.
    pub async fn build(
        embedder: Box<dyn EmbeddingProvider>,
        generator: Box<dyn ChatGenerator>,
        corpus: SnippetCorpus,
    ) -> Result<Self, PipelineError> {
        let retriever = Retriever::build(embedder, corpus).await?;
        Ok(Self {
            retriever,
            generator,
        })
    }

    /// Answer `query` grounded in the nearest corpus snippet.
    pub async fn answer(&self, query: &str) -> Result<RagAnswer, PipelineError> {
        let context = self.retriever.retrieve(query).await?;
        debug!(
            "grounding on snippet {} at distance {}",
            context.position, context.distance
        );

        let prompt = build_rag_prompt(&context.text, query);
        let text = self.generator.generate(&prompt).await?;

        Ok(RagAnswer { text, context })
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }
}
