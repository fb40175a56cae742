//! Document ingestion pipeline
//!
//! validate → classify → fetch key → encrypt → upload (retried), the whole sequence guarded by
//! a process-wide circuit breaker.

pub mod breaker;
pub mod classifier;
pub mod encryptor;
pub mod pipeline;
pub mod retry;
pub mod secrets;
pub mod types;
pub mod uploader;
pub mod validator;

pub use breaker::{BreakerOptions, BreakerState, CircuitBreaker};
pub use classifier::DocumentClassifier;
pub use encryptor::PayloadEncryptor;
pub use pipeline::IngestionPipeline;
pub use retry::RetryPolicy;
pub use secrets::SecretProvider;
pub use types::{ClassificationResult, EncryptedPayload, PipelineResult, UploadRequest};
pub use uploader::StorageUploader;
pub use validator::{FileValidator, ValidationError};
