use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("pdf extraction failed: {0}")]
    Pdf(String),
    #[error("csv parsing failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("json parsing failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("content is not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("{0} feature disabled")]
    FeatureDisabled(&'static str),
}
