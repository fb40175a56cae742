//! Text detection capability.

mod google_vision;

pub use google_vision::{GoogleVisionClient, VisionCredentials};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR request failed: {0}")]
    Request(String),

    #[error("OCR backend error: {0}")]
    Api(String),

    #[error("Invalid OCR response: {0}")]
    InvalidResponse(String),

    #[error("OCR authentication failed: {0}")]
    Auth(String),
}

/// Extracts printed text from an image.
#[async_trait]
pub trait TextDetector: Send + Sync {
    /// Full detected text, or `None` when the image contains no text at all.
    async fn detect_text(&self, image: &[u8]) -> Result<Option<String>, OcrError>;
}
