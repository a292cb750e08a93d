use std::fmt;

use cidchain_core::Document;

use crate::readers;
use crate::LoaderError;

/// The closed set of content types a loader knows how to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileType {
    Pdf,
    Csv,
    Json,
    Text,
}

impl FileType {
    /// Classifies a MIME string by substring, checking `pdf`, `csv`, `json` and `text` in
    /// that order.
    ///
    /// `text/csv` resolves to CSV and suffixed types like `application/ld+json` to JSON.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.to_ascii_lowercase();
        if mime.contains("pdf") {
            Some(FileType::Pdf)
        } else if mime.contains("csv") {
            Some(FileType::Csv)
        } else if mime.contains("json") {
            Some(FileType::Json)
        } else if mime.contains("text") {
            Some(FileType::Text)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Csv => "csv",
            FileType::Json => "json",
            FileType::Text => "text",
        }
    }

    pub fn read(self, bytes: &[u8]) -> Result<ReaderOutput, LoaderError> {
        match self {
            FileType::Pdf => readers::pdf_text(bytes).map(ReaderOutput::Text),
            FileType::Csv => readers::csv_rows(bytes).map(ReaderOutput::Rows),
            FileType::Json => readers::json_pretty(bytes).map(ReaderOutput::Text),
            FileType::Text => readers::utf8_text(bytes).map(ReaderOutput::Text),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn select_reader(mime: &str) -> Result<FileType, LoaderError> {
    FileType::from_mime(mime).ok_or_else(|| LoaderError::UnsupportedFileType(mime.to_string()))
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReaderOutput {
    Text(String),
    Rows(Vec<String>),
}

impl ReaderOutput {
    /// Wraps reader output as documents tagged with `ipfs_hash` and `file_type`.
    ///
    /// A single text payload becomes one document with `id == cid`; each CSV row becomes
    /// its own document with id `<cid>:<row>` and its zero-based row number under `index`.
    pub fn into_documents(self, cid: &str, file_type: &str) -> Vec<Document> {
        match self {
            ReaderOutput::Text(content) => vec![Document::new(cid, content)
                .with_metadata("ipfs_hash", cid)
                .with_metadata("file_type", file_type)],
            ReaderOutput::Rows(rows) => rows
                .into_iter()
                .enumerate()
                .map(|(index, content)| {
                    Document::new(format!("{cid}:{index}"), content)
                        .with_metadata("index", index)
                        .with_metadata("ipfs_hash", cid)
                        .with_metadata("file_type", file_type)
                })
                .collect(),
        }
    }
}
