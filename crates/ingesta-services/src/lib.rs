//! Ingesta Services Layer
//!
//! Clients for the external capabilities the ingestion pipeline depends on: text detection
//! (Google Cloud Vision) and secret retrieval (Google Secret Manager or the process
//! environment). Each capability sits behind a trait so the API crate and its tests can
//! swap implementations.

pub mod factory;
pub mod google_auth;
pub mod ocr;
pub mod secrets;

pub use factory::{create_secret_store, create_text_detector};
pub use google_auth::{AccessTokenSource, AuthError};
pub use ocr::{GoogleVisionClient, OcrError, TextDetector, VisionCredentials};
pub use secrets::{EnvSecretStore, SecretError, SecretManagerStore, SecretStore};
