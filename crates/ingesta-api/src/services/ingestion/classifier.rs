//! Financial document classification from OCR text

use super::types::ClassificationResult;
use ingesta_core::AppError;
use ingesta_services::TextDetector;
use std::sync::Arc;

/// Decides whether an image is an invoice or receipt.
///
/// Detected text is lower-cased and searched for any configured keyword as a plain substring.
#[derive(Clone)]
pub struct DocumentClassifier {
    detector: Arc<dyn TextDetector>,
    keywords: Vec<String>,
}

impl DocumentClassifier {
    pub fn new(detector: Arc<dyn TextDetector>, keywords: Vec<String>) -> Self {
        Self {
            detector,
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub async fn classify(&self, image: &[u8]) -> Result<ClassificationResult, AppError> {
        let detected_text = self.detector.detect_text(image).await.map_err(|e| {
            tracing::warn!(error = %e, "Text detection failed");
            AppError::ServiceUnavailable(e.to_string())
        })?;

        let is_financial_document = match detected_text.as_deref() {
            Some(text) => self.matches_keyword(text),
            None => false,
        };

        tracing::debug!(
            is_financial_document,
            has_text = detected_text.is_some(),
            "Document classified"
        );

        Ok(ClassificationResult {
            is_financial_document,
            detected_text,
        })
    }

    fn matches_keyword(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords.iter().any(|keyword| text.contains(keyword.as_str()))
    }
}
