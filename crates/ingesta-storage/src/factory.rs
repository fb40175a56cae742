#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(any(feature = "storage-gcs", feature = "storage-s3"))]
use crate::ObjectStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use ingesta_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-gcs")]
        StorageBackend::Gcs => {
            let storage = ObjectStorage::gcs(config.bucket_name().to_string())?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-gcs"))]
        StorageBackend::Gcs => Err(StorageError::ConfigError(
            "GCS storage backend not available (storage-gcs feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let storage = ObjectStorage::s3(config.bucket_name().to_string(), region, endpoint)?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            // The bucket becomes a directory under the configured root.
            let root = std::path::Path::new(&base_path).join(config.bucket_name());
            let storage = LocalStorage::new(root).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_local_storage_from_config() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().to_string_lossy().to_string();
        let config = Config::from_lookup(|name| match name {
            "BUCKET_NAME" => Some("bucket".to_string()),
            "KEY_NAME" => Some("key".to_string()),
            "PROJECT_ID" => Some("project".to_string()),
            "STORAGE_BACKEND" => Some("local".to_string()),
            "LOCAL_STORAGE_PATH" => Some(path.clone()),
            _ => None,
        })
        .unwrap();

        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);

        storage
            .put_object("ingesta/invoice.jpg", bytes::Bytes::from_static(b"sealed"))
            .await
            .unwrap();
        assert!(temp_dir.path().join("bucket/ingesta/invoice.jpg").exists());
    }
}
