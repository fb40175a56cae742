//! Types passed between pipeline stages

use bytes::Bytes;

/// An uploaded document as received from the caller. The pipeline only reads it.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub filename: Option<String>,
    pub content: Bytes,
}

impl UploadRequest {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: Some(filename.into()),
            content: content.into(),
        }
    }

    /// A request with no file attached.
    pub fn empty() -> Self {
        Self {
            filename: None,
            content: Bytes::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub is_financial_document: bool,
    pub detected_text: Option<String>,
}

/// Ciphertext plus the object key it will be stored under.
#[derive(Debug, Clone)]
pub struct EncryptedPayload {
    pub ciphertext: Bytes,
    pub storage_path: String,
}

/// Outcome of one ingestion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineResult {
    Accepted { storage_path: String },
    Rejected { reason: String },
    Unavailable { reason: String },
}

impl PipelineResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PipelineResult::Accepted { .. })
    }
}
