use async_trait::async_trait;

use crate::{Document, MetadataFilter, StoreError};

/// A search hit. Higher `score` means closer to the query.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub document: Document,
    pub score: f32,
}

/// Embedding-keyed document storage.
///
/// Implementations return at most `top_k` results, best first, skipping documents rejected
/// by `filter`.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Stores `docs`. Documents without an `embedding` are embedded by the store when it
    /// owns an embedder, and rejected otherwise.
    async fn add(&self, docs: Vec<Document>) -> Result<(), StoreError>;

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>, StoreError>;

    /// Removes documents by id. Unknown ids are ignored.
    async fn delete(&self, ids: &[String]) -> Result<(), StoreError>;
}
