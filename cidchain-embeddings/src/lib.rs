mod error;
mod hash;

#[cfg(feature = "openai")]
mod openai;

pub use error::EmbeddingProviderError;
pub use hash::HashEmbedder;

#[cfg(feature = "openai")]
pub use openai::OpenAiEmbedding;
