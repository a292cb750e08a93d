use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding invalid response: {0}")]
    InvalidResponse(String),
    #[error("Embedding provider error: {0}")]
    Provider(String),
    #[error("Embedding error: {0}")]
    Other(#[source] Box<dyn StdError + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("invalid document id: {0}")]
    InvalidId(String),
    #[error("duplicate document id: {0}")]
    DuplicateId(String),
    #[error("inconsistent store: {0}")]
    Inconsistent(String),
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
    #[error("Store error: {0}")]
    Internal(#[source] Box<dyn StdError + Send + Sync>),
}
