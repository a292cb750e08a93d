use cidchain_core::Document;
use cidchain_loaders::{detect_file_type, select_reader};
use tracing::Instrument;

use crate::{IpfsClient, IpfsConfig, IpfsError};

/// Loads a single CID as one or more documents.
#[derive(Clone, Debug)]
pub struct IpfsFileLoader {
    client: IpfsClient,
}

impl IpfsFileLoader {
    /// Builds a client for `config` and checks that the node is reachable.
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

    pub async fn load(&self, cid: &str) -> Result<Vec<Document>, IpfsError> {
        let span = tracing::info_span!("ipfs_load_file", cid = %cid);
        self.fetch_and_read(cid).instrument(span).await
    }

    async fn fetch_and_read(&self, cid: &str) -> Result<Vec<Document>, IpfsError> {
        let bytes = self.client.cat(cid).await?;
        load_bytes(cid, &bytes)
    }
}

/// Sniffs, reads and wraps content already fetched for `cid`.
pub fn load_bytes(cid: &str, bytes: &[u8]) -> Result<Vec<Document>, IpfsError> {
    let file_type = detect_file_type(bytes);
    let reader = select_reader(&file_type)?;
    tracing::debug!(cid, file_type = %file_type, reader = %reader, size = bytes.len(), "reading content");
    let output = reader.read(bytes)?;
    Ok(output.into_documents(cid, &file_type))
}
