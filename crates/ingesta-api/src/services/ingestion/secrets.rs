use ingesta_core::{AppError, KeyMaterial};
use ingesta_services::SecretStore;
use std::sync::Arc;

/// Fetches the encryption key for the configured key name.
///
/// Every call goes to the secret store; keys are never cached between uploads.
#[derive(Clone)]
pub struct SecretProvider {
    store: Arc<dyn SecretStore>,
    key_name: String,
}

impl SecretProvider {
    pub fn new(store: Arc<dyn SecretStore>, key_name: impl Into<String>) -> Self {
        Self {
            store,
            key_name: key_name.into(),
        }
    }

    pub async fn current_key(&self) -> Result<KeyMaterial, AppError> {
        let secret = self
            .store
            .get_current_secret(&self.key_name)
            .await
            .map_err(|e| {
                tracing::warn!(key_name = %self.key_name, error = %e, "Failed to fetch encryption key");
                AppError::ServiceUnavailable(e.to_string())
            })?;

        Ok(KeyMaterial::new(secret.into_bytes()))
    }
}
