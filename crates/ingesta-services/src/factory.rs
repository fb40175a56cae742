use crate::google_auth::AccessTokenSource;
use crate::ocr::{GoogleVisionClient, TextDetector, VisionCredentials};
use crate::secrets::{EnvSecretStore, SecretManagerStore, SecretStore};
use ingesta_core::{Config, SecretBackend};
use std::sync::Arc;

fn token_source(config: &Config) -> AccessTokenSource {
    AccessTokenSource::from_optional(config.google_access_token(), reqwest::Client::new())
}

/// Create the text detector based on configuration
///
/// An API key takes precedence; otherwise requests carry a bearer token.
pub fn create_text_detector(config: &Config) -> anyhow::Result<Arc<dyn TextDetector>> {
    let credentials = match config.google_vision_api_key() {
        Some(key) => VisionCredentials::ApiKey(key.to_string()),
        None => VisionCredentials::Bearer(token_source(config)),
    };

    let client = GoogleVisionClient::new(config.vision_endpoint(), credentials)?;
    Ok(Arc::new(client))
}

/// Create the secret store based on configuration
pub fn create_secret_store(config: &Config) -> anyhow::Result<Arc<dyn SecretStore>> {
    match config.secret_backend() {
        SecretBackend::SecretManager => {
            let store = SecretManagerStore::new(
                config.secret_manager_endpoint(),
                config.project_id(),
                config.secret_version(),
                token_source(config),
            )?;
            Ok(Arc::new(store))
        }
        SecretBackend::Env => Ok(Arc::new(EnvSecretStore::new())),
    }
}
