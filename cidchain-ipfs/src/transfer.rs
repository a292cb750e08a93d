use std::path::Path;

use cidchain_core::{Embedding, StoreError};
use cidchain_store::{DocstoreSnapshot, FlatIndex, FlatVectorStore};
use tracing::Instrument;

use crate::types::{DagLink, UploadFile};
use crate::{IpfsClient, IpfsConfig, IpfsError};

const INDEX_SUFFIX: &str = ".index";
const DOCSTORE_SUFFIX: &str = ".docstore";
const INDEX_FIELD: &str = "index";
const DOCSTORE_FIELD: &str = "docstore";

/// Moves a [`FlatVectorStore`] in and out of IPFS as a two-file directory.
#[derive(Clone, Debug)]
pub struct IpfsVectorStoreTransfer {
    client: IpfsClient,
}

impl IpfsVectorStoreTransfer {
    pub async fn connect(config: IpfsConfig) -> Result<Self, IpfsError> {
        let client = IpfsClient::new(config);
        client.check_daemon_running().await?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: IpfsClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &IpfsClient {
        &self.client
    }

    /// Uploads the index and docstore and returns the CID of the wrapping directory.
    pub async fn send_vectorstore<E>(&self, store: &FlatVectorStore<E>) -> Result<String, IpfsError>
    where
        E: Embedding,
    {
        let span = tracing::info_span!("ipfs_send_vectorstore");
        self.upload(store).instrument(span).await
    }

    /// Restores a store uploaded by [`send_vectorstore`](Self::send_vectorstore), bound to
    /// `embedder`.
    pub async fn get_vectorstore<E>(
        &self,
        cid: &str,
        embedder: E,
    ) -> Result<FlatVectorStore<E>, IpfsError>
    where
        E: Embedding,
    {
        let span = tracing::info_span!("ipfs_get_vectorstore", cid = %cid);
        self.restore(cid, embedder).instrument(span).await
    }

    async fn upload<E>(&self, store: &FlatVectorStore<E>) -> Result<String, IpfsError>
    where
        E: Embedding,
    {
        // Both temp files are removed when dropped at the end of this call.
        let index_file = tempfile::Builder::new().suffix(INDEX_SUFFIX).tempfile()?;
        store.write_index_file(index_file.path()).await?;
        let docstore_file = tempfile::Builder::new().suffix(DOCSTORE_SUFFIX).tempfile()?;
        store.write_docstore_file(docstore_file.path()).await?;

        let files = [
            upload_file(INDEX_FIELD, index_file.path()).await?,
            upload_file(DOCSTORE_FIELD, docstore_file.path()).await?,
        ];
        let cid = self.client.add_wrapped(&files).await?;
        tracing::info!(cid = %cid, "vector store uploaded");
        Ok(cid)
    }

    async fn restore<E>(&self, cid: &str, embedder: E) -> Result<FlatVectorStore<E>, IpfsError>
    where
        E: Embedding,
    {
        let root = self.client.dag_get(cid).await?;
        if root.links.len() != 2 {
            return Err(IpfsError::UnexpectedLinkCount {
                expected: 2,
                found: root.links.len(),
            });
        }

        let docstore_cid = find_link(&root.links, |name| name.contains(DOCSTORE_FIELD))
            .ok_or(IpfsError::MissingLink(DOCSTORE_FIELD))?;
        let index_cid = find_link(&root.links, |name| {
            name.contains(INDEX_FIELD) && !name.contains(DOCSTORE_FIELD)
        })
        .ok_or(IpfsError::MissingLink(INDEX_FIELD))?;

        let index_bytes = self.client.cat(index_cid).await?;
        let docstore_bytes = self.client.cat(docstore_cid).await?;

        let index_file = tempfile::Builder::new().suffix(INDEX_SUFFIX).tempfile()?;
        tokio::fs::write(index_file.path(), &index_bytes).await?;
        let index = FlatIndex::read_from_path(index_file.path()).map_err(StoreError::from)?;
        let snapshot = DocstoreSnapshot::from_slice(&docstore_bytes)?;

        let store = FlatVectorStore::from_snapshot(embedder, index, snapshot)?;
        tracing::info!(ntotal = store.ntotal().await, "vector store restored");
        Ok(store)
    }
}

fn find_link(links: &[DagLink], matches: impl Fn(&str) -> bool) -> Option<&str> {
    links
        .iter()
        .find(|link| matches(&link.name))
        .and_then(DagLink::cid)
}

async fn upload_file(field: &str, path: &Path) -> Result<UploadFile, IpfsError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| field.to_string());
    Ok(UploadFile {
        field: field.to_string(),
        file_name,
        bytes,
    })
}
