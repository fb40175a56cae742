//! Upload validation: presence, then extension, then size.

use super::types::UploadRequest;
use ingesta_core::AppError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No file found or the file has no name")]
    MissingFile,

    #[error("File extension not allowed")]
    ExtensionNotAllowed,

    #[error("File exceeds the maximum allowed size of {max_mb} MB")]
    TooLarge { max_mb: usize },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct FileValidator {
    allowed_extensions: Vec<String>,
    max_file_size: usize,
}

impl FileValidator {
    /// `allowed_extensions` are compared case-insensitively, without the leading dot.
    pub fn new(allowed_extensions: Vec<String>, max_file_size: usize) -> Self {
        Self {
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            max_file_size,
        }
    }

    /// Check a request and return its filename on success.
    pub fn validate<'a>(&self, request: &'a UploadRequest) -> Result<&'a str, ValidationError> {
        let filename = request
            .filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(ValidationError::MissingFile)?;

        if !self.is_allowed(filename) {
            return Err(ValidationError::ExtensionNotAllowed);
        }

        if request.size() > self.max_file_size {
            return Err(ValidationError::TooLarge {
                max_mb: self.max_file_size / 1024 / 1024,
            });
        }

        Ok(filename)
    }

    fn is_allowed(&self, filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((_, extension)) => {
                let extension = extension.to_lowercase();
                self.allowed_extensions.iter().any(|e| *e == extension)
            }
            None => false,
        }
    }
}
