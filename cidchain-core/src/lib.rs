mod document;
mod embedding;
mod error;
mod metadata_filter;
mod vector_store;

pub use document::Document;
pub use embedding::Embedding;
pub use error::{EmbeddingError, StoreError};
pub use metadata_filter::MetadataFilter;
pub use vector_store::{SearchResult, VectorStore};

pub type Value = serde_json::Value;
