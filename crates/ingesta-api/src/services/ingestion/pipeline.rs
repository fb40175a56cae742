//! Ingestion orchestration

use super::breaker::CircuitBreaker;
use super::classifier::DocumentClassifier;
use super::encryptor::PayloadEncryptor;
use super::secrets::SecretProvider;
use super::types::{PipelineResult, UploadRequest};
use super::uploader::StorageUploader;
use super::validator::FileValidator;
use ingesta_core::AppError;

/// Rejection reason for images that are not invoices or receipts
pub const NOT_FINANCIAL_MESSAGE: &str =
    "The file is not a financial document (invoice or receipt)";

/// Runs one upload through every stage, guarded by the shared breaker.
#[derive(Clone)]
pub struct IngestionPipeline {
    validator: FileValidator,
    classifier: DocumentClassifier,
    secrets: SecretProvider,
    encryptor: PayloadEncryptor,
    uploader: StorageUploader,
    breaker: CircuitBreaker,
}

impl IngestionPipeline {
    pub fn new(
        validator: FileValidator,
        classifier: DocumentClassifier,
        secrets: SecretProvider,
        encryptor: PayloadEncryptor,
        uploader: StorageUploader,
        breaker: CircuitBreaker,
    ) -> Self {
        Self {
            validator,
            classifier,
            secrets,
            encryptor,
            uploader,
            breaker,
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub async fn ingest(&self, request: &UploadRequest) -> PipelineResult {
        match self.breaker.call(|| self.run(request)).await {
            Ok(result) => result,
            Err(AppError::InvalidInput(reason)) => PipelineResult::Rejected { reason },
            Err(e) => PipelineResult::Unavailable {
                reason: e.message().to_string(),
            },
        }
    }

    /// A negative classification completes the guarded call normally, so it is an `Ok`
    /// outcome for the breaker.
    async fn run(&self, request: &UploadRequest) -> Result<PipelineResult, AppError> {
        let filename = self.validator.validate(request)?;

        let classification = self.classifier.classify(&request.content).await?;
        if !classification.is_financial_document {
            tracing::info!(filename = %filename, "Upload rejected: not a financial document");
            return Ok(PipelineResult::Rejected {
                reason: NOT_FINANCIAL_MESSAGE.to_string(),
            });
        }

        let payload = {
            let key = self.secrets.current_key().await?;
            self.encryptor.encrypt(filename, &request.content, &key)?
        };

        let storage_path = self.uploader.upload(&payload).await?;
        Ok(PipelineResult::Accepted { storage_path })
    }
}
