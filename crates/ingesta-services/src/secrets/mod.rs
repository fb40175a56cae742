//! Secret retrieval capability.

mod env;
mod secret_manager;

pub use env::EnvSecretStore;
pub use secret_manager::SecretManagerStore;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Secret request failed: {0}")]
    Request(String),

    #[error("Secret backend error: {0}")]
    Api(String),

    #[error("Invalid secret payload: {0}")]
    InvalidPayload(String),

    #[error("Secret backend authentication failed: {0}")]
    Auth(String),
}

/// Source of the current value of a named secret.
///
/// Implementations must not cache: every call reflects the backend's current version.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_current_secret(&self, key_id: &str) -> Result<String, SecretError>;
}
