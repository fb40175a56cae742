//! OAuth access tokens for Google REST APIs.
//!
//! Tokens are fetched on every call. Inside Google Cloud the metadata server hands out
//! short-lived tokens for the attached service account; elsewhere a token can be provided
//! through `GOOGLE_ACCESS_TOKEN`.

use serde::Deserialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use thiserror::Error;

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token request failed: {0}")]
    Request(String),

    #[error("Metadata server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// Where bearer tokens come from.
#[derive(Clone)]
pub enum AccessTokenSource {
    /// A fixed token, typically from `GOOGLE_ACCESS_TOKEN`.
    Static(String),
    /// The GCE/Cloud Run metadata server.
    MetadataServer {
        http_client: reqwest::Client,
        token_url: String,
    },
}

impl Debug for AccessTokenSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AccessTokenSource::Static(_) => f.write_str("AccessTokenSource::Static(..)"),
            AccessTokenSource::MetadataServer { token_url, .. } => f
                .debug_struct("AccessTokenSource::MetadataServer")
                .field("token_url", token_url)
                .finish(),
        }
    }
}

impl AccessTokenSource {
    /// Use `static_token` when present, the metadata server otherwise.
    pub fn from_optional(static_token: Option<&str>, http_client: reqwest::Client) -> Self {
        match static_token {
            Some(token) => AccessTokenSource::Static(token.to_string()),
            None => AccessTokenSource::metadata_server(http_client),
        }
    }

    pub fn metadata_server(http_client: reqwest::Client) -> Self {
        AccessTokenSource::MetadataServer {
            http_client,
            token_url: METADATA_TOKEN_URL.to_string(),
        }
    }

    pub async fn access_token(&self) -> Result<String, AuthError> {
        match self {
            AccessTokenSource::Static(token) => Ok(token.clone()),
            AccessTokenSource::MetadataServer {
                http_client,
                token_url,
            } => {
                let response = http_client
                    .get(token_url)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await
                    .map_err(|e| AuthError::Request(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(AuthError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }

                let token: MetadataToken = response
                    .json()
                    .await
                    .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
                Ok(token.access_token)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

    fn metadata_source(server: &MockServer) -> AccessTokenSource {
        AccessTokenSource::MetadataServer {
            http_client: reqwest::Client::new(),
            token_url: format!("{}{}", server.uri(), TOKEN_PATH),
        }
    }

    #[tokio::test]
    async fn test_static_token_is_returned_verbatim() {
        let source = AccessTokenSource::from_optional(Some("ya29.token"), reqwest::Client::new());
        assert_eq!(source.access_token().await.unwrap(), "ya29.token");
        assert!(!format!("{:?}", source).contains("ya29"));
    }

    #[tokio::test]
    async fn test_metadata_server_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(TOKEN_PATH))
            .and(header("Metadata-Flavor", "Google"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "from-metadata",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let source = metadata_source(&server);
        assert_eq!(source.access_token().await.unwrap(), "from-metadata");
        // No caching: a second call hits the server again.
        assert_eq!(source.access_token().await.unwrap(), "from-metadata");
    }

    #[tokio::test]
    async fn test_metadata_server_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no service account"))
            .mount(&server)
            .await;

        let err = metadata_source(&server).access_token().await.unwrap_err();
        assert!(matches!(err, AuthError::Status { status: 404, .. }));
    }
}
