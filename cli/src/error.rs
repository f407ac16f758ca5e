use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("corpus file {} contains no snippets", .0.display())]
    EmptyCorpus(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ragline_core::config::ConfigError),

    #[error(transparent)]
    Embedding(#[from] ragline_core::embedding::EmbeddingError),

    #[error(transparent)]
    Generation(#[from] ragline_core::generation::GenerationError),

    #[error(transparent)]
    Retrieval(#[from] ragline_core::retrieval::RetrievalError),

    #[error(transparent)]
    Pipeline(#[from] ragline_core::pipeline::PipelineError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
