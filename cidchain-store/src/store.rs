use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use cidchain_core::{
    Document, Embedding, MetadataFilter, SearchResult, StoreError, VectorStore,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{DocstoreSnapshot, FlatIndex, InMemoryDocstore};

pub const INDEX_FILE_NAME: &str = "vectorstore.index";
pub const DOCSTORE_FILE_NAME: &str = "vectorstore.docstore";

#[derive(Debug)]
struct StoreInner {
    index: FlatIndex,
    docstore: InMemoryDocstore,
    index_to_docstore_id: Vec<String>,
}

/// Vector store over a [`FlatIndex`], embedding text through `E`.
#[derive(Debug)]
pub struct FlatVectorStore<E> {
    embedder: E,
    inner: RwLock<StoreInner>,
}

impl<E> FlatVectorStore<E>
where
    E: Embedding,
{
    pub fn new(embedder: E) -> Self {
        let index = FlatIndex::new(embedder.dimension());
        Self {
            embedder,
            inner: RwLock::new(StoreInner {
                index,
                docstore: InMemoryDocstore::new(),
                index_to_docstore_id: Vec::new(),
            }),
        }
    }

    pub fn from_parts(
        embedder: E,
        index: FlatIndex,
        docstore: InMemoryDocstore,
        index_to_docstore_id: Vec<String>,
    ) -> Result<Self, StoreError> {
        if index.ntotal() != index_to_docstore_id.len() {
            return Err(StoreError::Inconsistent(format!(
                "index holds {} vectors but {} ids are mapped",
                index.ntotal(),
                index_to_docstore_id.len()
            )));
        }
        if let Some(missing) = index_to_docstore_id
            .iter()
            .find(|id| !docstore.contains(id.as_str()))
        {
            return Err(StoreError::Inconsistent(format!(
                "mapped id '{missing}' is missing from the docstore"
            )));
        }
        if index.dimension() != embedder.dimension() {
            tracing::warn!(
                index_dim = index.dimension(),
                embedder_dim = embedder.dimension(),
                "embedder dimension differs from index dimension"
            );
        }

        Ok(Self {
            embedder,
            inner: RwLock::new(StoreInner {
                index,
                docstore,
                index_to_docstore_id,
            }),
        })
    }

    pub fn from_snapshot(
        embedder: E,
        index: FlatIndex,
        snapshot: DocstoreSnapshot,
    ) -> Result<Self, StoreError> {
        Self::from_parts(
            embedder,
            index,
            snapshot.docstore,
            snapshot.index_to_docstore_id,
        )
    }

    pub async fn from_documents(embedder: E, docs: Vec<Document>) -> Result<Self, StoreError> {
        let store = Self::new(embedder);
        store.add_documents(docs).await?;
        Ok(store)
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub async fn ntotal(&self) -> usize {
        self.inner.read().await.index.ntotal()
    }

    pub async fn dimension(&self) -> usize {
        self.inner.read().await.index.dimension()
    }

    /// Document ids in index row order.
    pub async fn document_ids(&self) -> Vec<String> {
        self.inner.read().await.index_to_docstore_id.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Document> {
        self.inner.read().await.docstore.search(id).cloned()
    }

    /// Embeds each document's content and adds it. Empty ids are replaced with UUIDs;
    /// the final ids are returned in input order.
    pub async fn add_documents(&self, docs: Vec<Document>) -> Result<Vec<String>, StoreError> {
        if docs.is_empty() {
            return Ok(Vec::new());
        }
        let texts: Vec<String> = docs.iter().map(|doc| doc.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != docs.len() {
            return Err(StoreError::Inconsistent(format!(
                "embedder returned {} vectors for {} documents",
                embeddings.len(),
                docs.len()
            )));
        }
        self.insert(docs.into_iter().zip(embeddings).collect()).await
    }

    async fn insert(&self, entries: Vec<(Document, Vec<f32>)>) -> Result<Vec<String>, StoreError> {
        let mut inner = self.inner.write().await;

        let mut docs = Vec::with_capacity(entries.len());
        let mut vectors = Vec::with_capacity(entries.len());
        let mut batch_ids = HashSet::new();
        for (mut doc, vector) in entries {
            if doc.id.trim().is_empty() {
                doc.id = Uuid::new_v4().to_string();
            }
            if inner.docstore.contains(&doc.id) || !batch_ids.insert(doc.id.clone()) {
                return Err(StoreError::DuplicateId(doc.id));
            }
            doc.embedding = None;
            docs.push(doc);
            vectors.push(vector);
        }

        inner.index.add(&vectors)?;
        let ids: Vec<String> = docs.iter().map(|doc| doc.id.clone()).collect();
        inner.index_to_docstore_id.extend(ids.iter().cloned());
        inner.docstore.add(docs)?;

        tracing::debug!(added = ids.len(), ntotal = inner.index.ntotal(), "added vectors");
        Ok(ids)
    }

    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>, StoreError> {
        let scored = self.similarity_search_with_score(query, k, None).await?;
        Ok(scored.into_iter().map(|(doc, _)| doc).collect())
    }

    /// Returns documents with their L2 distance to the query, nearest first.
    pub async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<(Document, f32)>, StoreError> {
        let embedding = self.embedder.embed(query).await?;
        self.similarity_search_by_vector(&embedding, k, filter).await
    }

    pub async fn similarity_search_by_vector(
        &self,
        embedding: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<(Document, f32)>, StoreError> {
        let inner = self.inner.read().await;
        let fetch = if filter.is_some() { inner.index.ntotal() } else { k };
        let hits = inner.index.search(embedding, fetch)?;

        let mut out = Vec::with_capacity(k.min(hits.len()));
        for (row, distance) in hits {
            if out.len() == k {
                break;
            }
            let Some(doc) = inner
                .index_to_docstore_id
                .get(row)
                .and_then(|id| inner.docstore.search(id))
            else {
                continue;
            };
            if filter.map_or(true, |filter| filter.matches(&doc.metadata)) {
                out.push((doc.clone(), distance));
            }
        }
        Ok(out)
    }

    /// Removes documents and their vectors. Unknown ids are ignored.
    pub async fn delete_documents(&self, ids: &[String]) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().await;
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let rows: BTreeSet<usize> = inner
            .index_to_docstore_id
            .iter()
            .enumerate()
            .filter(|(_, id)| wanted.contains(id.as_str()))
            .map(|(row, _)| row)
            .collect();
        if rows.is_empty() {
            return Ok(0);
        }

        let removed = inner.index.remove_rows(&rows);
        inner
            .index_to_docstore_id
            .retain(|id| !wanted.contains(id.as_str()));
        inner.docstore.delete(ids);
        Ok(removed)
    }

    pub async fn index_bytes(&self) -> Result<Vec<u8>, StoreError> {
        Ok(self.inner.read().await.index.to_bytes()?)
    }

    pub async fn docstore_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let inner = self.inner.read().await;
        DocstoreSnapshot {
            index_to_docstore_id: inner.index_to_docstore_id.clone(),
            docstore: inner.docstore.clone(),
        }
        .to_vec()
    }

    pub async fn write_index_file(&self, path: &Path) -> Result<(), StoreError> {
        let bytes = self.index_bytes().await?;
        tokio::fs::write(path, bytes).await.map_err(io_error)
    }

    pub async fn write_docstore_file(&self, path: &Path) -> Result<(), StoreError> {
        let bytes = self.docstore_bytes().await?;
        tokio::fs::write(path, bytes).await.map_err(io_error)
    }

    pub async fn save_local(&self, dir: &Path) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(dir).await.map_err(io_error)?;
        self.write_index_file(&dir.join(INDEX_FILE_NAME)).await?;
        self.write_docstore_file(&dir.join(DOCSTORE_FILE_NAME)).await
    }

    pub async fn load_local(dir: &Path, embedder: E) -> Result<Self, StoreError> {
        let index_bytes = tokio::fs::read(dir.join(INDEX_FILE_NAME))
            .await
            .map_err(io_error)?;
        let docstore_bytes = tokio::fs::read(dir.join(DOCSTORE_FILE_NAME))
            .await
            .map_err(io_error)?;
        let index = FlatIndex::from_bytes(&index_bytes)?;
        Self::from_snapshot(embedder, index, DocstoreSnapshot::from_slice(&docstore_bytes)?)
    }
}

fn io_error(err: std::io::Error) -> StoreError {
    StoreError::Internal(Box::new(err))
}

/// Maps an L2 distance onto a `(0, 1]` similarity so higher is better.
fn distance_to_score(distance: f32) -> f32 {
    1.0 / (1.0 + distance)
}

#[async_trait::async_trait]
impl<E> VectorStore for FlatVectorStore<E>
where
    E: Embedding,
{
    async fn add(&self, docs: Vec<Document>) -> Result<(), StoreError> {
        let mut entries = Vec::with_capacity(docs.len());
        for mut doc in docs {
            let vector = match doc.embedding.take() {
                Some(vector) => vector,
                None => self.embedder.embed(&doc.content).await?,
            };
            entries.push((doc, vector));
        }
        self.insert(entries).await.map(|_| ())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<SearchResult>, StoreError> {
        let hits = self
            .similarity_search_by_vector(query_embedding, top_k, filter)
            .await?;
        Ok(hits
            .into_iter()
            .map(|(document, distance)| SearchResult {
                document,
                score: distance_to_score(distance),
            })
            .collect())
    }

    async fn delete(&self, ids: &[String]) -> Result<(), StoreError> {
        self.delete_documents(ids).await.map(|_| ())
    }
}
