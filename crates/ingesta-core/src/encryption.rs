//! Encryption service for uploaded documents
//!
//! Documents are sealed with AES-256-GCM. The stored blob layout is
//! `nonce (12 bytes) || ciphertext || tag (16 bytes)`.

use crate::AppError;
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose, Engine as _};
use std::fmt::{Debug, Formatter, Result as FmtResult};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Symmetric key material as returned by the secret store.
///
/// Valid for a single encryption: callers fetch a fresh value for every upload.
#[derive(Clone)]
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Resolve the 32-byte AES key.
    ///
    /// Secrets are usually stored base64 encoded (standard or URL-safe alphabet, padded or
    /// not, which also covers Fernet keys). A raw 32-byte value is accepted as-is.
    fn to_key_bytes(&self) -> Result<[u8; KEY_LEN], AppError> {
        let text = std::str::from_utf8(&self.0).map(str::trim).ok();

        if let Some(text) = text {
            let engines = [
                &general_purpose::STANDARD,
                &general_purpose::URL_SAFE,
                &general_purpose::STANDARD_NO_PAD,
                &general_purpose::URL_SAFE_NO_PAD,
            ];
            for engine in engines {
                if let Ok(decoded) = engine.decode(text) {
                    if let Ok(key) = <[u8; KEY_LEN]>::try_from(decoded.as_slice()) {
                        return Ok(key);
                    }
                }
            }
        }

        <[u8; KEY_LEN]>::try_from(self.0.as_slice()).map_err(|_| {
            AppError::Internal("Encryption key must be 32 bytes (256 bits)".to_string())
        })
    }
}

impl Debug for KeyMaterial {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("KeyMaterial")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

/// Encryption service for document payloads
/// Uses AES-256-GCM for authenticated encryption
#[derive(Clone)]
pub struct EncryptionService {
    cipher: Aes256Gcm,
}

impl EncryptionService {
    /// Create a new encryption service from raw 32-byte key (e.g. for tests).
    pub fn from_key_bytes(key_bytes: &[u8]) -> Result<Self, AppError> {
        if key_bytes.len() != KEY_LEN {
            return Err(AppError::Internal(
                "Encryption key must be 32 bytes (256 bits)".to_string(),
            ));
        }
        let key = Key::<Aes256Gcm>::from_slice(key_bytes);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// Create a new encryption service from key material fetched from the secret store.
    pub fn from_key_material(material: &KeyMaterial) -> Result<Self, AppError> {
        let key = material.to_key_bytes()?;
        Self::from_key_bytes(&key)
    }

    /// Encrypt a byte slice. The input is only borrowed.
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<Vec<u8>, AppError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|e| AppError::Internal(format!("Encryption failed: {}", e)))?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);
        Ok(combined)
    }

    /// Decrypt a blob produced by [`EncryptionService::encrypt_bytes`].
    pub fn decrypt_bytes(&self, sealed: &[u8]) -> Result<Vec<u8>, AppError> {
        if sealed.len() < NONCE_LEN {
            return Err(AppError::Internal("Encrypted data too short".to_string()));
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|e| AppError::Internal(format!("Decryption failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> EncryptionService {
        let test_key = b"01234567890123456789012345678901";
        EncryptionService::from_key_bytes(test_key).unwrap()
    }

    #[test]
    fn test_encryption_decryption() {
        let service = test_service();
        let plaintext = b"\x89PNG\r\n\x1a\n fake image body".to_vec();

        let encrypted = service.encrypt_bytes(&plaintext).unwrap();
        assert_ne!(encrypted, plaintext);
        assert_eq!(encrypted.len(), plaintext.len() + NONCE_LEN + 16);

        let decrypted = service.decrypt_bytes(&encrypted).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_encryption_is_randomized() {
        let service = test_service();
        let a = service.encrypt_bytes(b"same input").unwrap();
        let b = service.encrypt_bytes(b"same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_and_binary_payloads_round_trip() {
        let service = test_service();
        for payload in [Vec::new(), (0u8..=255).collect::<Vec<u8>>(), vec![0u8; 70_000]] {
            let sealed = service.encrypt_bytes(&payload).unwrap();
            assert_eq!(service.decrypt_bytes(&sealed).unwrap(), payload);
        }
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = test_service().encrypt_bytes(b"invoice").unwrap();
        let other = EncryptionService::from_key_bytes(&[7u8; 32]).unwrap();
        assert!(other.decrypt_bytes(&sealed).is_err());
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let service = test_service();
        let mut sealed = service.encrypt_bytes(b"invoice").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(service.decrypt_bytes(&sealed).is_err());
        assert!(service.decrypt_bytes(&[0u8; 4]).is_err());
    }

    #[test]
    fn test_key_material_accepts_base64_variants() {
        let raw = [42u8; 32];
        let encoded = [
            general_purpose::STANDARD.encode(raw),
            general_purpose::URL_SAFE.encode(raw),
            general_purpose::URL_SAFE_NO_PAD.encode(raw),
        ];
        for value in encoded {
            let material = KeyMaterial::new(value.into_bytes());
            let service = EncryptionService::from_key_material(&material).unwrap();
            let sealed = service.encrypt_bytes(b"receipt").unwrap();
            let direct = EncryptionService::from_key_bytes(&raw).unwrap();
            assert_eq!(direct.decrypt_bytes(&sealed).unwrap(), b"receipt");
        }
    }

    #[test]
    fn test_key_material_accepts_raw_key_and_rejects_short() {
        assert!(EncryptionService::from_key_material(&KeyMaterial::new([1u8; 32].to_vec())).is_ok());
        assert!(EncryptionService::from_key_material(&KeyMaterial::new(b"short".to_vec())).is_err());
    }

    #[test]
    fn test_key_material_debug_is_redacted() {
        let material = KeyMaterial::new(b"super-secret".to_vec());
        let rendered = format!("{:?}", material);
        assert!(!rendered.contains("super-secret"));
    }
}
