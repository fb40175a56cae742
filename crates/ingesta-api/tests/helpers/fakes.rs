use async_trait::async_trait;
use bytes::Bytes;
use ingesta_core::StorageBackend;
use ingesta_services::{OcrError, SecretError, SecretStore, TextDetector};
use ingesta_storage::{Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

pub struct FakeTextDetector {
    text: Mutex<Option<String>>,
    failing: AtomicBool,
    calls: AtomicU32,
}

impl FakeTextDetector {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Mutex::new(Some(text.to_string())),
            failing: AtomicBool::new(false),
            calls: AtomicU32::new(0),
        }
    }

    pub fn set_text(&self, text: Option<&str>) {
        *self.text.lock().unwrap() = text.map(str::to_string);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextDetector for FakeTextDetector {
    async fn detect_text(&self, _image: &[u8]) -> Result<Option<String>, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(OcrError::Api("Vision API quota exceeded".to_string()));
        }
        Ok(self.text.lock().unwrap().clone())
    }
}

/// OCR backend that panics inside the request.
pub struct PanickingTextDetector;

#[async_trait]
impl TextDetector for PanickingTextDetector {
    async fn detect_text(&self, _image: &[u8]) -> Result<Option<String>, OcrError> {
        panic!("vision response decoder crashed");
    }
}

pub struct FakeSecretStore {
    value: Mutex<String>,
    calls: AtomicU32,
}

impl FakeSecretStore {
    pub fn new(value: &str) -> Self {
        Self {
            value: Mutex::new(value.to_string()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn rotate(&self, value: &str) {
        *self.value.lock().unwrap() = value.to_string();
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for FakeSecretStore {
    async fn get_current_secret(&self, _key_id: &str) -> Result<String, SecretError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.value.lock().unwrap().clone())
    }
}

/// In-memory store whose next `put_object` calls can be made to fail.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, Bytes>>,
    failures_left: AtomicU32,
    put_attempts: AtomicU32,
}

impl MemoryStorage {
    pub fn fail_next(&self, count: u32) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    pub fn put_attempts(&self) -> u32 {
        self.put_attempts.load(Ordering::SeqCst)
    }

    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put_object(&self, key: &str, data: Bytes) -> StorageResult<()> {
        self.put_attempts.fetch_add(1, Ordering::SeqCst);
        let fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Err(StorageError::UploadFailed("503 Service Unavailable".to_string()));
        }
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> StorageResult<Bytes> {
        self.object(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
