//! Export errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("granularity must be at least 1, got {0}")]
    InvalidGranularity(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;
