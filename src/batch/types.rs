use serde::Serialize;
use serde_json::Value;

use crate::engine::{AggregateStatistics, JudgementSummary, MappedDocument};
use crate::error::DocumentError;
use crate::scanner::FileInfo;

/// A document as supplied to the engine: an identifier plus either the
/// parsed JSON or the reason it could not be read
#[derive(Debug)]
pub struct SourceDocument {
    pub identifier: String,
    pub file: Option<FileInfo>,
    pub payload: Result<Value, DocumentError>,
}

impl SourceDocument {
    pub fn parsed(identifier: impl Into<String>, document: Value) -> Self {
        Self {
            identifier: identifier.into(),
            file: None,
            payload: Ok(document),
        }
    }

    pub fn failed(identifier: impl Into<String>, error: DocumentError) -> Self {
        Self {
            identifier: identifier.into(),
            file: None,
            payload: Err(error),
        }
    }
}

/// A successfully mapped document
#[derive(Debug, Clone, Serialize)]
pub struct MappedEntry {
    pub identifier: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileInfo>,
    #[serde(flatten)]
    pub document: MappedDocument,
}

/// A document that could not be read or decoded
#[derive(Debug, Clone, Serialize)]
pub struct FailedEntry {
    pub identifier: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileInfo>,
    pub error: String,
}

/// Per-document outcome of a batch
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DocumentResult {
    Mapped(MappedEntry),
    Failed(FailedEntry),
}

impl DocumentResult {
    pub fn identifier(&self) -> &str {
        match self {
            DocumentResult::Mapped(entry) => &entry.identifier,
            DocumentResult::Failed(entry) => &entry.identifier,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DocumentResult::Mapped(_))
    }

    pub fn mapped(&self) -> Option<&MappedDocument> {
        match self {
            DocumentResult::Mapped(entry) => Some(&entry.document),
            DocumentResult::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DocumentResult::Mapped(_) => None,
            DocumentResult::Failed(entry) => Some(&entry.error),
        }
    }

    pub fn file(&self) -> Option<&FileInfo> {
        match self {
            DocumentResult::Mapped(entry) => entry.file.as_ref(),
            DocumentResult::Failed(entry) => entry.file.as_ref(),
        }
    }
}

/// Result of mapping a batch of documents
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub aggregate: AggregateStatistics,
    pub judgement_summary: JudgementSummary,
    pub documents: Vec<DocumentResult>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = &DocumentResult> {
        self.documents.iter().filter(|result| !result.is_success())
    }
}

/// One file received by the upload endpoint
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Upload endpoint response body
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    /// Files submitted, including skipped non-JSON files
    pub total: usize,
    /// Files mapped without a decode error
    pub success: usize,
    pub results: Vec<DocumentResult>,
    pub aggregate: AggregateStatistics,
    pub judgement_summary: JudgementSummary,
}
