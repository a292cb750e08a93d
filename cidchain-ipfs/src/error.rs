use cidchain_core::StoreError;
use cidchain_loaders::LoaderError;
use thiserror::Error;

use crate::Operation;

#[derive(Debug, Error)]
pub enum IpfsError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(
        "failed to {operation} for {target} after {attempts} attempts: IPFS node not running or not accessible"
    )]
    Unreachable {
        operation: Operation,
        target: String,
        attempts: usize,
    },
    #[error("ipfs api error {status} on {operation} for {target}: {message}")]
    Api {
        operation: Operation,
        target: String,
        status: u16,
        message: String,
    },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("expected {expected} links under the vector store root, found {found}")]
    UnexpectedLinkCount { expected: usize, found: usize },
    #[error("vector store root has no '{0}' link")]
    MissingLink(&'static str),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IpfsError> for StoreError {
    fn from(value: IpfsError) -> Self {
        match value {
            IpfsError::Store(inner) => inner,
            other => StoreError::Internal(Box::new(other)),
        }
    }
}
