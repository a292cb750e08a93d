use std::vec;

use cidchain_core::Document;
use tracing::Instrument;

use crate::types::{DagLink, FileEntry};
use crate::{IpfsClient, IpfsConfig, IpfsError, IpfsFileLoader};

struct Frame {
    cid: String,
    links: vec::IntoIter<DagLink>,
}

/// Loads every file reachable from a directory CID.
#[derive(Clone, Debug)]
pub struct IpfsDirectoryLoader {
    files: IpfsFileLoader,
}

impl IpfsDirectoryLoader {
    pub async fn connect(config: IpfsConfig) -> Result<Self, IpfsError> {
        let client = IpfsClient::new(config);
        client.check_daemon_running().await?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: IpfsClient) -> Self {
        Self {
            files: IpfsFileLoader::with_client(client),
        }
    }

    pub fn client(&self) -> &IpfsClient {
        self.files.client()
    }

    /// Walks the DAG depth-first in server link order and returns every link whose name
    /// has an extension.
    ///
    /// Links back to a CID on the current path are skipped, so a malformed cyclic DAG
    /// terminates. A CID linked from several places is still visited once per link.
    pub async fn list_files(&self, cid: &str) -> Result<Vec<FileEntry>, IpfsError> {
        let client = self.client();
        let root = client.dag_get(cid).await?;
        let mut stack = vec![Frame {
            cid: cid.to_string(),
            links: root.links.into_iter(),
        }];
        let mut files = Vec::new();

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            let Some(link) = frame.links.next() else {
                stack.pop();
                continue;
            };
            let Some(link_cid) = link.cid() else {
                continue;
            };

            if link.is_file() {
                files.push(FileEntry {
                    cid: link_cid.to_string(),
                    name: link.name.clone(),
                });
                continue;
            }

            if stack.iter().any(|frame| frame.cid == link_cid) {
                tracing::warn!(cid = %link_cid, name = %link.name, "skipping link back to an ancestor");
                continue;
            }

            let node = client.dag_get(link_cid).await?;
            stack.push(Frame {
                cid: link_cid.to_string(),
                links: node.links.into_iter(),
            });
        }

        Ok(files)
    }

    /// Loads every file under `cid`, tagging documents with the link name as `source`.
    /// Files that fail to load are logged and left out.
    pub async fn load(&self, cid: &str) -> Result<Vec<Document>, IpfsError> {
        let span = tracing::info_span!("ipfs_load_directory", cid = %cid);
        self.load_entries(cid).instrument(span).await
    }

    async fn load_entries(&self, cid: &str) -> Result<Vec<Document>, IpfsError> {
        let entries = self.list_files(cid).await?;
        tracing::debug!(files = entries.len(), "resolved directory");

        let mut results = Vec::new();
        for entry in entries {
            match self.files.load(&entry.cid).await {
                Ok(docs) => {
                    results.extend(docs.into_iter().map(|mut doc| {
                        doc.set_metadata("source", entry.name.as_str());
                        doc
                    }));
                }
                Err(err) => {
                    tracing::error!(
                        name = %entry.name,
                        cid = %entry.cid,
                        error = %err,
                        "failed to load file, skipping"
                    );
                }
            }
        }
        Ok(results)
    }
}
