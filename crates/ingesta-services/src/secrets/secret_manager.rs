//! Google Secret Manager over REST

use super::{SecretError, SecretStore};
use crate::google_auth::AccessTokenSource;
use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use std::time::Duration;

/// Reads `projects/{project}/secrets/{key}/versions/{version}` on every call.
#[derive(Debug, Clone)]
pub struct SecretManagerStore {
    http_client: reqwest::Client,
    endpoint: String,
    project_id: String,
    version: String,
    tokens: AccessTokenSource,
}

#[derive(Debug, Deserialize)]
struct AccessSecretVersionResponse {
    payload: Option<SecretPayload>,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    data: Option<String>,
}

impl SecretManagerStore {
    pub fn new(
        endpoint: impl Into<String>,
        project_id: impl Into<String>,
        version: impl Into<String>,
        tokens: AccessTokenSource,
    ) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client for Secret Manager")?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            version: version.into(),
            tokens,
        })
    }

    /// Resource name of the secret version, as Secret Manager spells it.
    pub fn version_name(&self, key_id: &str) -> String {
        format!(
            "projects/{}/secrets/{}/versions/{}",
            self.project_id, key_id, self.version
        )
    }
}

#[async_trait]
impl SecretStore for SecretManagerStore {
    async fn get_current_secret(&self, key_id: &str) -> Result<String, SecretError> {
        let name = self.version_name(key_id);
        let url = format!("{}/v1/{}:access", self.endpoint, name);

        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|e| SecretError::Auth(e.to_string()))?;

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SecretError::Request(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SecretError::NotFound(name));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SecretError::Api(format!("{} - {}", status, error_text)));
        }

        let body: AccessSecretVersionResponse = response
            .json()
            .await
            .map_err(|e| SecretError::InvalidPayload(e.to_string()))?;

        let data = body
            .payload
            .and_then(|p| p.data)
            .ok_or_else(|| SecretError::InvalidPayload("missing payload.data".to_string()))?;

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(data.as_bytes())
            .map_err(|e| SecretError::InvalidPayload(e.to_string()))?;

        let value = String::from_utf8(decoded)
            .map_err(|_| SecretError::InvalidPayload("payload is not valid UTF-8".to_string()))?;

        tracing::debug!(secret = %name, "Fetched secret version");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ACCESS_PATH: &str =
        "/v1/projects/acme-finance/secrets/accounting-client-key/versions/latest:access";

    fn store(server: &MockServer) -> SecretManagerStore {
        SecretManagerStore::new(
            server.uri(),
            "acme-finance",
            "latest",
            AccessTokenSource::Static("ya29.token".to_string()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetches_and_decodes_payload_every_call() {
        let server = MockServer::start().await;
        let encoded = base64::engine::general_purpose::STANDARD.encode("fernet-key-value");
        Mock::given(method("GET"))
            .and(path(ACCESS_PATH))
            .and(header("Authorization", "Bearer ya29.token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "projects/123/secrets/accounting-client-key/versions/4",
                "payload": { "data": encoded }
            })))
            .expect(2)
            .mount(&server)
            .await;

        let store = store(&server);
        for _ in 0..2 {
            let value = store
                .get_current_secret("accounting-client-key")
                .await
                .unwrap();
            assert_eq!(value, "fernet-key-value");
        }
    }

    #[tokio::test]
    async fn test_missing_secret() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = store(&server)
            .get_current_secret("accounting-client-key")
            .await
            .unwrap_err();
        assert!(matches!(err, SecretError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_backend_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let err = store(&server)
            .get_current_secret("accounting-client-key")
            .await
            .unwrap_err();
        assert!(matches!(err, SecretError::Api(_)));
    }

    #[tokio::test]
    async fn test_payload_without_data_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "projects/123/secrets/accounting-client-key/versions/4"
            })))
            .mount(&server)
            .await;

        let err = store(&server)
            .get_current_secret("accounting-client-key")
            .await
            .unwrap_err();
        assert!(matches!(err, SecretError::InvalidPayload(_)));
    }
}
