//! Ingesta Storage Library
//!
//! This crate provides the storage abstraction and its implementations for Ingesta:
//! Google Cloud Storage and S3 through `object_store`, plus the local filesystem.
//!
//! # Storage key format
//!
//! Every backend stores encrypted documents under the same key layout:
//! `{bucket_folder}/{filename}`. The filename is the one supplied by the uploader.
//! Key generation is centralized in the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(any(feature = "storage-gcs", feature = "storage-s3"))]
pub mod object;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use ingesta_core::StorageBackend;
pub use keys::object_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(any(feature = "storage-gcs", feature = "storage-s3"))]
pub use object::ObjectStorage;
pub use traits::{Storage, StorageError, StorageResult};
