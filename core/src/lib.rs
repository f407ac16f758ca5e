//! Core library for ragline: a minimal retrieval-augmented-generation
//! engine plus the training-side batch collator.
//!
//! Three stages collaborate behind narrow trait seams:
//!
//! - [`embedding::EmbeddingProvider`] maps text to fixed-dimension vectors;
//! - [`index::VectorIndex`] answers nearest-neighbor queries over the
//!   embedded corpus by squared Euclidean distance;
//! - [`generation::ChatGenerator`] turns a context-conditioned prompt into
//!   free text.
//!
//! [`pipeline::RagPipeline`] wires them into the strictly linear per-query
//! flow: embed the query, scan the index, take the top snippet, format the
//! prompt, generate. [`collate`] is the independent fine-tuning side:
//! chat-formatted examples in, model-ready batches with masked labels out.

pub mod collate;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod generation;
pub mod index;
pub mod pipeline;
pub mod prompt;
pub mod retrieval;

pub use collate::Collator;
pub use collate::IGNORE_INDEX;
pub use collate::SpecialTokenMap;
pub use collate::TrainingBatch;
pub use collate::TrainingExample;
pub use config::RaglineConfig;
pub use corpus::SnippetCorpus;
pub use embedding::EmbeddingProvider;
pub use embedding::EmbeddingVector;
pub use generation::ChatGenerator;
pub use index::Neighbor;
pub use index::VectorIndex;
pub use pipeline::RagAnswer;
pub use pipeline::RagPipeline;
pub use prompt::ChatMessage;
pub use prompt::MessageContent;
pub use prompt::Role;
pub use prompt::build_rag_prompt;
pub use retrieval::RetrievedSnippet;
pub use retrieval::Retriever;
