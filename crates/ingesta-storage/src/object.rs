//! Cloud object storage backed by `object_store`.
//!
//! GCS and S3 share one implementation; only the builder differs.

use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStore, ObjectStoreExt, PutPayload, Result as ObjectResult};
use std::sync::Arc;

/// Object storage implementation for cloud buckets
#[derive(Clone)]
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    backend: StorageBackend,
}

impl ObjectStorage {
    /// Wrap an already-built store. Tests use this with `object_store::memory::InMemory`.
    pub fn new(store: impl ObjectStore, bucket: impl Into<String>, backend: StorageBackend) -> Self {
        ObjectStorage {
            store: Arc::new(store),
            bucket: bucket.into(),
            backend,
        }
    }

    /// Create a Google Cloud Storage backend.
    ///
    /// Credentials come from the environment (`GOOGLE_SERVICE_ACCOUNT`,
    /// `GOOGLE_APPLICATION_CREDENTIALS` or the metadata server).
    #[cfg(feature = "storage-gcs")]
    pub fn gcs(bucket: String) -> StorageResult<Self> {
        use object_store::gcp::GoogleCloudStorageBuilder;

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket.clone())
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::new(store, bucket, StorageBackend::Gcs))
    }

    /// Create an S3 backend
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    #[cfg(feature = "storage-s3")]
    pub fn s3(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        use object_store::aws::AmazonS3Builder;

        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::new(store, bucket, StorageBackend::S3))
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl Storage for ObjectStorage {
    async fn put_object(&self, key: &str, data: Bytes) -> StorageResult<()> {
        let size = data.len();
        let location = Path::from(key);
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self.store.put(&location, PutPayload::from(data)).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                backend = %self.backend,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Object upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            backend = %self.backend,
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object upload successful"
        );

        Ok(())
    }

    async fn get_object(&self, key: &str) -> StorageResult<Bytes> {
        let location = Path::from(key);

        let result: ObjectResult<_> = self.store.get(&location).await;
        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => StorageError::DownloadFailed(other.to_string()),
        })?;

        result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    fn test_storage() -> ObjectStorage {
        ObjectStorage::new(InMemory::new(), "test-bucket", StorageBackend::Gcs)
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let storage = test_storage();
        let data = Bytes::from_static(b"sealed bytes");
        storage
            .put_object("ingesta/invoice.jpg", data.clone())
            .await
            .unwrap();

        let stored = storage.get_object("ingesta/invoice.jpg").await.unwrap();
        assert_eq!(stored, data);
        assert_eq!(storage.backend_type(), StorageBackend::Gcs);
        assert_eq!(storage.bucket(), "test-bucket");
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_object() {
        let storage = test_storage();
        storage
            .put_object("ingesta/receipt.png", Bytes::from_static(b"first"))
            .await
            .unwrap();
        storage
            .put_object("ingesta/receipt.png", Bytes::from_static(b"second"))
            .await
            .unwrap();

        let stored = storage.get_object("ingesta/receipt.png").await.unwrap();
        assert_eq!(stored, Bytes::from_static(b"second"));
    }

    #[tokio::test]
    async fn test_get_missing_object_is_not_found() {
        let storage = test_storage();
        let err = storage.get_object("ingesta/missing.jpg").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
