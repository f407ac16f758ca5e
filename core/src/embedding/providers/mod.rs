//! Bundled embedding provider implementations.

pub mod hash;
pub mod openai;

pub use hash::HashProvider;
pub use openai::OpenAIProvider;
