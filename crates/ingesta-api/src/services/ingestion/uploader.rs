use super::retry::RetryPolicy;
use super::types::EncryptedPayload;
use ingesta_core::AppError;
use ingesta_storage::Storage;
use std::sync::Arc;

/// Writes encrypted payloads to object storage under a retry policy.
#[derive(Clone)]
pub struct StorageUploader {
    storage: Arc<dyn Storage>,
    retry: RetryPolicy,
}

impl StorageUploader {
    pub fn new(storage: Arc<dyn Storage>, retry: RetryPolicy) -> Self {
        Self { storage, retry }
    }

    /// Store the payload and return its storage path.
    pub async fn upload(&self, payload: &EncryptedPayload) -> Result<String, AppError> {
        let path = payload.storage_path.as_str();
        let start = std::time::Instant::now();

        self.retry
            .run("put_object", |attempt| {
                let data = payload.ciphertext.clone();
                tracing::debug!(storage_path = %path, attempt, "Uploading encrypted document");
                async move { self.storage.put_object(path, data).await }
            })
            .await
            .map_err(|e| {
                AppError::ServiceUnavailable(format!(
                    "Upload failed after {} attempts: {}",
                    self.retry.max_attempts(),
                    e
                ))
            })?;

        tracing::info!(
            storage_path = %path,
            backend = %self.storage.backend_type(),
            size_bytes = payload.ciphertext.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Encrypted document stored"
        );

        Ok(payload.storage_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use ingesta_storage::{StorageBackend, StorageError, StorageResult};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Fails the first `failures` puts, then records writes.
    struct FlakyStorage {
        failures: u32,
        calls: AtomicU32,
        written: Mutex<Vec<(String, Bytes)>>,
    }

    impl FlakyStorage {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                written: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Storage for FlakyStorage {
        async fn put_object(&self, key: &str, data: Bytes) -> StorageResult<()> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.failures {
                return Err(StorageError::UploadFailed(format!("503 on attempt {}", n)));
            }
            self.written.lock().unwrap().push((key.to_string(), data));
            Ok(())
        }

        async fn get_object(&self, key: &str) -> StorageResult<Bytes> {
            Err(StorageError::NotFound(key.to_string()))
        }

        fn backend_type(&self) -> StorageBackend {
            StorageBackend::Gcs
        }
    }

    fn payload() -> EncryptedPayload {
        EncryptedPayload {
            ciphertext: Bytes::from_static(b"sealed"),
            storage_path: "ingesta/invoice.jpg".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_on_third_attempt() {
        let storage = Arc::new(FlakyStorage::new(2));
        let uploader = StorageUploader::new(storage.clone(), RetryPolicy::default());

        let path = uploader.upload(&payload()).await.unwrap();

        assert_eq!(path, "ingesta/invoice.jpg");
        assert_eq!(storage.calls.load(Ordering::SeqCst), 3);
        let written = storage.written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].1, Bytes::from_static(b"sealed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_are_service_unavailable() {
        let storage = Arc::new(FlakyStorage::new(u32::MAX));
        let uploader =
            StorageUploader::new(storage.clone(), RetryPolicy::new(3, Duration::from_secs(2)));

        let err = uploader.upload(&payload()).await.unwrap_err();

        assert_eq!(storage.calls.load(Ordering::SeqCst), 3);
        match err {
            AppError::ServiceUnavailable(msg) => assert!(msg.contains("503 on attempt 3")),
            other => panic!("Expected ServiceUnavailable, got {:?}", other),
        }
    }
}
