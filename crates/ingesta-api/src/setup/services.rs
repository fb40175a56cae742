//! Capability wiring for the ingestion pipeline

use crate::services::ingestion::{
    BreakerOptions, CircuitBreaker, DocumentClassifier, FileValidator, IngestionPipeline,
    PayloadEncryptor, RetryPolicy, SecretProvider, StorageUploader,
};
use crate::state::AppState;
use anyhow::{Context, Result};
use ingesta_core::Config;
use ingesta_services::{create_secret_store, create_text_detector, SecretStore, TextDetector};
use ingesta_storage::{create_storage, Storage};
use std::sync::Arc;

/// Build the production capabilities from configuration and assemble the state.
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let detector = create_text_detector(config).context("Failed to create OCR client")?;
    let secret_store = create_secret_store(config).context("Failed to create secret store")?;
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage")?;

    tracing::info!(
        backend = %storage.backend_type(),
        bucket = %config.bucket_name(),
        folder = %config.bucket_folder_name(),
        "Storage initialized"
    );

    let pipeline = build_pipeline(config, detector, secret_store, storage);
    Ok(Arc::new(AppState::new(config.clone(), pipeline)))
}

/// Assemble the pipeline around the given capabilities.
///
/// The breaker created here is the only one for the process; every request shares it.
pub fn build_pipeline(
    config: &Config,
    detector: Arc<dyn TextDetector>,
    secret_store: Arc<dyn SecretStore>,
    storage: Arc<dyn Storage>,
) -> IngestionPipeline {
    let validator = FileValidator::new(
        config.allowed_extensions().to_vec(),
        config.max_file_size_bytes(),
    );
    let classifier = DocumentClassifier::new(detector, config.financial_keywords().to_vec());
    let secrets = SecretProvider::new(secret_store, config.key_name());
    let encryptor = PayloadEncryptor::new(config.bucket_folder_name());
    let uploader = StorageUploader::new(
        storage,
        RetryPolicy::new(config.upload_max_attempts(), config.upload_retry_delay()),
    );
    let breaker = CircuitBreaker::new(BreakerOptions {
        failure_threshold: config.breaker_failure_threshold(),
        reset_timeout: config.breaker_reset_timeout(),
        count_client_errors: config.breaker_count_client_errors(),
    });

    IngestionPipeline::new(validator, classifier, secrets, encryptor, uploader, breaker)
}
