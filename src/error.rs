//! Per-document failures
//!
//! These never abort a batch: each one is reported against the document it
//! belongs to while the remaining documents are still mapped.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("file read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("JSON decode error: invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl DocumentError {
    /// Short kind name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            DocumentError::Io(_) => "io",
            DocumentError::Decode(_) | DocumentError::Utf8(_) => "decode",
        }
    }
}

/// Parse raw bytes into a document
pub fn decode_document(bytes: &[u8]) -> Result<serde_json::Value, DocumentError> {
    let text = std::str::from_utf8(bytes)?;
    Ok(serde_json::from_str(text)?)
}
