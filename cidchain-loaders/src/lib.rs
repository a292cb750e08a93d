//! File-type detection and per-type readers.
//!
//! Bytes fetched from a content-addressed store carry no file name, so the type is sniffed
//! from the content ([`detect_file_type`]), mapped onto the closed [`FileType`] set
//! ([`select_reader`]) and read into text or CSV rows ([`FileType::read`]).

mod error;
mod file_type;
mod readers;
mod sniff;

pub use error::LoaderError;
pub use file_type::{select_reader, FileType, ReaderOutput};
pub use sniff::detect_file_type;
