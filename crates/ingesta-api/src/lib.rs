//! Ingesta API Library
//!
//! HTTP surface, ingestion pipeline and application setup for the document ingestion service.

pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::{ErrorResponse, HttpAppError};
pub use services::ingestion::{IngestionPipeline, PipelineResult, UploadRequest};
pub use state::AppState;
