use super::types::EncryptedPayload;
use bytes::Bytes;
use ingesta_core::{AppError, EncryptionService, KeyMaterial};
use ingesta_storage::object_key;

/// Seals document bytes and picks the object key they are stored under.
#[derive(Debug, Clone)]
pub struct PayloadEncryptor {
    folder: String,
}

impl PayloadEncryptor {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// Encrypt `content` with `key`. The caller's buffer is only borrowed.
    ///
    /// The storage path is `{folder}/{filename}` with the filename taken verbatim.
    pub fn encrypt(
        &self,
        filename: &str,
        content: &[u8],
        key: &KeyMaterial,
    ) -> Result<EncryptedPayload, AppError> {
        let sealed = EncryptionService::from_key_material(key)
            .and_then(|service| service.encrypt_bytes(content))
            .map_err(|e| {
                tracing::warn!(error = %e, "Document encryption failed");
                AppError::ServiceUnavailable(e.message().to_string())
            })?;

        Ok(EncryptedPayload {
            ciphertext: Bytes::from(sealed),
            storage_path: object_key(&self.folder, filename),
        })
    }
}
