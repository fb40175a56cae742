//! Google Cloud Vision text detection

use super::{OcrError, TextDetector};
use crate::google_auth::AccessTokenSource;
use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

/// How requests to the Vision API are authorized
#[derive(Clone)]
pub enum VisionCredentials {
    ApiKey(String),
    Bearer(AccessTokenSource),
}

/// Google Cloud Vision `images:annotate` client using `TEXT_DETECTION`
#[derive(Clone)]
pub struct GoogleVisionClient {
    http_client: reqwest::Client,
    endpoint: String,
    credentials: VisionCredentials,
}

impl Debug for GoogleVisionClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GoogleVisionClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GoogleVisionClient {
    pub fn new(endpoint: impl Into<String>, credentials: VisionCredentials) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client for Google Vision API")?;

        Ok(Self::with_client(http_client, endpoint, credentials))
    }

    pub fn with_client(
        http_client: reqwest::Client,
        endpoint: impl Into<String>,
        credentials: VisionCredentials,
    ) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    async fn annotate(&self, image: &[u8]) -> Result<VisionResponse, OcrError> {
        let url = format!("{}/v1/images:annotate", self.endpoint);
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(image);

        let request_body = json!({
            "requests": [{
                "image": { "content": image_base64 },
                "features": [{ "type": "TEXT_DETECTION" }]
            }]
        });

        let mut request = self.http_client.post(&url).json(&request_body);
        request = match &self.credentials {
            VisionCredentials::ApiKey(key) => request.query(&[("key", key.as_str())]),
            VisionCredentials::Bearer(tokens) => {
                let token = tokens
                    .access_token()
                    .await
                    .map_err(|e| OcrError::Auth(e.to_string()))?;
                request.bearer_auth(token)
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| OcrError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OcrError::Api(format!(
                "Google Vision API request failed: {} - {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| OcrError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl TextDetector for GoogleVisionClient {
    async fn detect_text(&self, image: &[u8]) -> Result<Option<String>, OcrError> {
        let start = std::time::Instant::now();
        let response = self.annotate(image).await?;

        let first = match response.responses.and_then(|r| r.into_iter().next()) {
            Some(first) => first,
            None => return Ok(None),
        };

        if let Some(error) = first.error {
            if let Some(message) = error.message.filter(|m| !m.is_empty()) {
                return Err(OcrError::Api(message));
            }
        }

        // The first annotation carries the full text; the rest are individual words.
        let text = first
            .text_annotations
            .and_then(|annotations| annotations.into_iter().next())
            .and_then(|annotation| annotation.description)
            .filter(|text| !text.is_empty());

        tracing::debug!(
            image_size = image.len(),
            text_len = text.as_ref().map(|t| t.len()).unwrap_or(0),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Google Vision text detection completed"
        );

        Ok(text)
    }
}

// Google Cloud Vision API response types
#[derive(Debug, Deserialize)]
struct VisionResponse {
    responses: Option<Vec<AnnotateImageResponse>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    text_annotations: Option<Vec<EntityAnnotation>>,
    error: Option<VisionError>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VisionError {
    message: Option<String>,
}
