//! Document upload endpoint

use crate::constants::UPLOAD_FIELD;
use crate::error::HttpAppError;
use crate::services::ingestion::{PipelineResult, UploadRequest};
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use ingesta_core::AppError;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    /// Object key the ciphertext was stored under
    pub filename: String,
}

fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body exceeds the upload limit".to_string())
    } else {
        AppError::InvalidInput(format!("{}: {}", context, err.body_text()))
    }
}

/// Read the single `file` field from the form.
///
/// A missing field yields an empty request so the validator reports it. A part without a
/// filename keeps its bytes but no name.
pub async fn extract_upload(mut multipart: Multipart) -> Result<UploadRequest, AppError> {
    let mut upload: Option<UploadRequest> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart", e))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if upload.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let content = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read file data", e))?;

        upload = Some(UploadRequest { filename, content });
    }

    Ok(upload.unwrap_or_else(UploadRequest::empty))
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let is_production = state.config.is_production();

    let request = extract_upload(multipart)
        .await
        .map_err(|e| HttpAppError::new(e, is_production))?;

    tracing::debug!(
        filename = request.filename.as_deref().unwrap_or(""),
        size = request.size(),
        "Upload received"
    );

    match state.pipeline.ingest(&request).await {
        PipelineResult::Accepted { storage_path } => {
            tracing::info!(storage_path = %storage_path, "Document stored");
            Ok(Json(UploadResponse {
                success: true,
                message: format!(
                    "File uploaded and encrypted successfully: {}",
                    storage_path
                ),
                filename: storage_path,
            }))
        }
        PipelineResult::Rejected { reason } => Err(HttpAppError::new(
            AppError::InvalidInput(reason),
            is_production,
        )),
        PipelineResult::Unavailable { reason } => Err(HttpAppError::new(
            AppError::ServiceUnavailable(reason),
            is_production,
        )),
    }
}
