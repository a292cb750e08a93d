//! IPFS integration for cidchain.
//!
//! This crate provides:
//! - `IpfsFileLoader`: fetch one CID, sniff its type, read it into documents,
//! - `IpfsDirectoryLoader`: walk a directory DAG and load every file under it,
//! - `IpfsVectorStoreTransfer`: push a `FlatVectorStore` to IPFS and restore it by CID.
//!
//! All of them talk to the node HTTP API (`/api/v0/...`) through `IpfsClient`, either a
//! local daemon or a hosted gateway with basic auth, retrying connection failures
//! according to the configured `RetryPolicy`.
//!
//! Environment variables read by `IpfsConfig::from_env`:
//! - `IPFS_API_URL`
//! - `IPFS_USE_INFURA`
//! - `INFURA_API_KEY`
//! - `INFURA_API_SECRET`

pub mod client;
mod config;
mod directory;
mod error;
mod file;
mod retry;
mod transfer;
pub mod types;

pub use client::IpfsClient;
pub use config::{
    Credentials, Endpoint, IpfsConfig, IpfsConfigBuilder, API_PATH, INFURA_API_URL,
    LOCAL_API_URL,
};
pub use directory::IpfsDirectoryLoader;
pub use error::IpfsError;
pub use file::{load_bytes, IpfsFileLoader};
pub use retry::{AttemptError, Operation, RetryPolicy};
pub use transfer::IpfsVectorStoreTransfer;
