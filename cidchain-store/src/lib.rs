//! Exhaustive L2 vector index paired with an in-memory docstore.
//!
//! [`FlatVectorStore`] keeps three pieces in lockstep: the [`FlatIndex`] rows, the
//! row-to-document-id mapping, and the [`InMemoryDocstore`]. The index and the
//! mapping+docstore pair persist as two separate files so they can be shipped
//! independently (see `cidchain-ipfs`).

mod docstore;
mod index;
mod store;

pub use docstore::{DocstoreSnapshot, InMemoryDocstore};
pub use index::{FlatIndex, FlatIndexError};
pub use store::{FlatVectorStore, DOCSTORE_FILE_NAME, INDEX_FILE_NAME};
