//! Ingesta Core Library
//!
//! This crate provides the error types, configuration, constants and payload encryption
//! shared by every Ingesta component.

pub mod config;
pub mod constants;
pub mod encryption;
pub mod error;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IngestionConfig, LogFormat};
pub use encryption::{EncryptionService, KeyMaterial};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::{SecretBackend, StorageBackend};
